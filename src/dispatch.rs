use crate::presets::Presets;
use crate::resource::{GroupId, LightState};
use crate::rotation::Rotation;

/// Outbound seam to the bridge. The daemon only ever issues group commands,
/// so this is the whole surface an implementation has to provide.
#[async_trait::async_trait]
pub trait GroupClient {
    async fn set_group_state(&self, group: GroupId, state: &LightState) -> crate::Result<()>;
}

#[derive(Debug, thiserror::Error)]
pub enum DispatchError {
    #[error("unknown room {0:?}")]
    UnknownRoom(String),
    #[error("bridge request failed: {0}")]
    Bridge(#[from] crate::HueError),
}

/// Orchestrates a single "apply scene S to room R" operation: resolves both
/// names, invokes the bridge client, and for button triggers advances the
/// rotation.
pub struct Dispatcher<C> {
    presets: Presets,
    rotation: Rotation,
    client: C,
    surface_bridge_errors: bool,
}

impl<C: GroupClient + Sync> Dispatcher<C> {
    pub fn new(
        presets: Presets,
        rotation: Rotation,
        client: C,
        surface_bridge_errors: bool,
    ) -> Self {
        Dispatcher {
            presets,
            rotation,
            client,
            surface_bridge_errors,
        }
    }

    /// Applies a caller-chosen scene to a room. The rotation is not touched.
    pub async fn apply_named_scene(
        &self,
        room: &str,
        scene: &str,
    ) -> Result<String, DispatchError> {
        let group = self.resolve_room(room)?;
        let state = self.presets.light_state(scene);
        self.send(group, &state, scene).await?;
        Ok(scene.to_string())
    }

    /// Button trigger: applies the rotation's current scene to a room, then
    /// advances the cursor exactly once, whether or not the bridge call
    /// succeeded. Returns the scene that was applied, not the one coming up
    /// next.
    pub async fn trigger_next_scene(&self, room: &str) -> Result<String, DispatchError> {
        let group = self.resolve_room(room)?;
        let scene = self.rotation.current().to_string();
        let state = self.presets.light_state(&scene);
        let outcome = self.send(group, &state, &scene).await;
        self.rotation.advance();
        outcome?;
        Ok(scene)
    }

    /// Scene the next button press will apply. Read-only: no resolution, no
    /// dispatch, no advance.
    pub fn peek_scene(&self) -> &str {
        self.rotation.current()
    }

    fn resolve_room(&self, room: &str) -> Result<GroupId, DispatchError> {
        let group = self.presets.group_id(room);
        if !group.is_valid() {
            return Err(DispatchError::UnknownRoom(room.to_string()));
        }
        Ok(group)
    }

    async fn send(
        &self,
        group: GroupId,
        state: &LightState,
        scene: &str,
    ) -> Result<(), DispatchError> {
        match self.client.set_group_state(group, state).await {
            Ok(()) => {
                log::info!("applied scene {scene:?} to group {group}");
                Ok(())
            }
            Err(e) if self.surface_bridge_errors => Err(DispatchError::Bridge(e)),
            Err(e) => {
                log::error!("bridge rejected scene {scene:?} for group {group}: {e}");
                Ok(())
            }
        }
    }
}
