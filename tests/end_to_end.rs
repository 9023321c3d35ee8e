/// End-to-end scenario over the loopback transport: a server hosts and mints
/// an identity, a client connects and binds the server-chosen id to a local
/// proxy, and typed messages flow in both directions.
use std::{cell::RefCell, rc::Rc};

use tether_net::{
    LoopbackHub, MessageKind, NetworkConfig, NetworkId, NetworkIdentity, NetworkManager,
};

#[derive(Debug, Copy, Clone, PartialEq, Eq, Hash)]
struct Entity(u32);

#[test]
fn identity_handoff_and_message_round_trip() {
    let config = NetworkConfig {
        max_clients: 2,
        ..NetworkConfig::default()
    };
    let hub = LoopbackHub::new(config.max_clients);
    let mut server: NetworkManager<Entity> = NetworkManager::new(config.clone(), hub.endpoint());
    let mut client: NetworkManager<Entity> = NetworkManager::new(config, hub.endpoint());

    // server hosts and allocates id 1 for entity A
    server.host("127.0.0.1").unwrap();
    let mut server_side = NetworkIdentity::new(Entity(1));
    let id = server.create_network_id(&mut server_side).unwrap();
    assert_eq!(id, NetworkId::from(1));
    assert_eq!(server.network_entity(id), Some(Entity(1)));

    // client connects and binds the server-chosen id to its local proxy
    let connected = Rc::new(RefCell::new(None));
    let connected_inner = connected.clone();
    client.connect("127.0.0.1", move |outcome| {
        *connected_inner.borrow_mut() = Some(outcome);
    });
    client.receive();
    assert_eq!(*connected.borrow(), Some(true));
    assert_eq!(client.client_index(), Some(0));

    let mut proxy = NetworkIdentity::new(Entity(101));
    client.assign_network_id(id, &mut proxy).unwrap();
    assert_eq!(client.network_entity(id), Some(Entity(101)));

    // server sends a message of kind T to slot 0; the client's registered
    // handler for T fires exactly once with the payload
    let kind = MessageKind::from(7);
    let received = Rc::new(RefCell::new(Vec::new()));
    let received_inner = received.clone();
    client.register_client_handler(kind, move |_, message| {
        received_inner.borrow_mut().push(message.payload().to_vec());
    });

    let mut message = server.create_server_message(0, kind);
    message.payload_mut().extend_from_slice(b"spawn");
    server.send_from_server(0, message).unwrap();

    client.receive();
    assert_eq!(*received.borrow(), vec![b"spawn".to_vec()]);

    // and back: a client message reaches the server handler with its slot
    let echoes = Rc::new(RefCell::new(Vec::new()));
    let echoes_inner = echoes.clone();
    server.register_server_handler(kind, move |_, slot, message| {
        echoes_inner
            .borrow_mut()
            .push((slot, message.payload().to_vec()));
    });

    let mut reply = client.create_client_message(kind);
    reply.payload_mut().extend_from_slice(b"ack");
    client.send_from_client(reply).unwrap();

    server.receive();
    assert_eq!(*echoes.borrow(), vec![(0, b"ack".to_vec())]);
}

#[test]
fn two_clients_occupy_distinct_slots() {
    let config = NetworkConfig {
        max_clients: 2,
        ..NetworkConfig::default()
    };
    let hub = LoopbackHub::new(config.max_clients);
    let mut server: NetworkManager<Entity> = NetworkManager::new(config.clone(), hub.endpoint());
    let mut first: NetworkManager<Entity> = NetworkManager::new(config.clone(), hub.endpoint());
    let mut second: NetworkManager<Entity> = NetworkManager::new(config, hub.endpoint());

    server.host("127.0.0.1").unwrap();
    first.connect("127.0.0.1", |_| {});
    first.receive();
    second.connect("127.0.0.1", |_| {});
    second.receive();

    assert_eq!(first.client_index(), Some(0));
    assert_eq!(second.client_index(), Some(1));
    assert!(server.is_remote_client_connected(0));
    assert!(server.is_remote_client_connected(1));

    // a full server turns the next attempt away
    let mut third: NetworkManager<Entity> =
        NetworkManager::new(NetworkConfig::default(), hub.endpoint());
    let outcome = Rc::new(RefCell::new(None));
    let outcome_inner = outcome.clone();
    third.connect("127.0.0.1", move |connected| {
        *outcome_inner.borrow_mut() = Some(connected);
    });
    third.receive();
    assert_eq!(*outcome.borrow(), Some(false));
}
