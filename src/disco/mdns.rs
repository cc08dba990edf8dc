use std::net::{IpAddr, Ipv4Addr, SocketAddr, SocketAddrV4};
use std::time::Duration;
use tokio::net::UdpSocket;
use tokio::time::{timeout_at, Instant};

use crate::HueError;

const MDNS_GROUP: SocketAddr =
    SocketAddr::V4(SocketAddrV4::new(Ipv4Addr::new(224, 0, 0, 251), 5353));
const QUERY_ID: u16 = 0x4875;
const RESPONSE_DEADLINE: Duration = Duration::from_secs(3);

/// One-shot "legacy" DNS-SD browse for `service`: a single PTR question sent
/// to the multicast group, answered with the source address of the first
/// matching response.
///
/// Binding an ephemeral port instead of 5353 makes the bridge reply with a
/// unicast response, so no multicast group membership is needed. Note that
/// this binds a single interface; on multi-homed hosts other interfaces are
/// not browsed.
pub(super) async fn query_once(service: &str) -> Result<IpAddr, HueError> {
    let socket = UdpSocket::bind((Ipv4Addr::UNSPECIFIED, 0))
        .await
        .map_err(HueError::MdnsError)?;

    let mut query = dns_parser::Builder::new_query(QUERY_ID, false);
    // DNS-SD browse queries are PTR questions, RFC 6763 (4.1)
    query.add_question(
        service,
        true,
        dns_parser::QueryType::PTR,
        dns_parser::QueryClass::IN,
    );
    let packet = query.build().unwrap();

    socket
        .send_to(&packet, MDNS_GROUP)
        .await
        .map_err(HueError::MdnsError)?;

    let deadline = Instant::now() + RESPONSE_DEADLINE;
    let mut buf = [0_u8; 4096];
    // Other mDNS traffic can land on the socket; keep reading until a
    // response to our question shows up or the deadline passes.
    loop {
        let (len, origin) = timeout_at(deadline, socket.recv_from(&mut buf))
            .await
            .map_err(|_elapsed| {
                HueError::MdnsError(std::io::Error::new(
                    std::io::ErrorKind::TimedOut,
                    "no mDNS response before the deadline",
                ))
            })?
            .map_err(HueError::MdnsError)?;

        if is_answer_for(&buf[..len], service) {
            return Ok(origin.ip());
        }
    }
}

/// Accepts only responses that echo our question back.
fn is_answer_for(bytes: &[u8], service: &str) -> bool {
    let Ok(packet) = dns_parser::Packet::parse(bytes) else {
        return false;
    };
    packet.header.id == QUERY_ID
        && packet.questions.first().is_some_and(|question| {
            question.qtype == dns_parser::QueryType::PTR && question.qname.to_string() == service
        })
}
