/// Tests for the message callback registry: registration-order invocation,
/// unregistration during dispatch, and per-kind bucket isolation.
use std::{cell::RefCell, rc::Rc};

use tether_net::{CallbackRegistry, HandlerHandle, MessageBuffer, MessageKind};

#[test]
fn n_handlers_each_invoked_exactly_once_in_registration_order() {
    let mut registry = CallbackRegistry::new();
    let kind = MessageKind::from(1);
    let order = Rc::new(RefCell::new(Vec::new()));

    for tag in 0..5 {
        let order = order.clone();
        registry.register_client(
            kind,
            Box::new(move |_, _| {
                order.borrow_mut().push(tag);
            }),
        );
    }

    registry.dispatch_client(kind, &MessageBuffer::new(kind));
    assert_eq!(*order.borrow(), vec![0, 1, 2, 3, 4]);
}

#[test]
fn handler_unregistering_itself_does_not_disturb_the_others() {
    let mut registry = CallbackRegistry::new();
    let kind = MessageKind::from(2);
    let order = Rc::new(RefCell::new(Vec::new()));

    let order_a = order.clone();
    registry.register_client(
        kind,
        Box::new(move |_, _| {
            order_a.borrow_mut().push("a");
        }),
    );

    let handle_cell: Rc<RefCell<Option<HandlerHandle>>> = Rc::new(RefCell::new(None));
    let order_b = order.clone();
    let handle_b = handle_cell.clone();
    let handle = registry.register_client(
        kind,
        Box::new(move |dispatch, _| {
            order_b.borrow_mut().push("b");
            let handle = handle_b.borrow().unwrap();
            dispatch.unregister_client_handler(kind, handle);
        }),
    );
    *handle_cell.borrow_mut() = Some(handle);

    let order_c = order.clone();
    registry.register_client(
        kind,
        Box::new(move |_, _| {
            order_c.borrow_mut().push("c");
        }),
    );

    registry.dispatch_client(kind, &MessageBuffer::new(kind));
    assert_eq!(*order.borrow(), vec!["a", "b", "c"]);

    // the self-removed handler is gone on the next dispatch
    registry.dispatch_client(kind, &MessageBuffer::new(kind));
    assert_eq!(*order.borrow(), vec!["a", "b", "c", "a", "c"]);
}

#[test]
fn handler_unregistering_another_does_not_skip_the_current_pass() {
    let mut registry = CallbackRegistry::new();
    let kind = MessageKind::from(3);
    let order = Rc::new(RefCell::new(Vec::new()));

    // first handler removes the second; the second still runs this pass
    let victim_cell: Rc<RefCell<Option<HandlerHandle>>> = Rc::new(RefCell::new(None));
    let victim_ref = victim_cell.clone();
    let order_a = order.clone();
    registry.register_client(
        kind,
        Box::new(move |dispatch, _| {
            order_a.borrow_mut().push("a");
            let victim = victim_ref.borrow().unwrap();
            dispatch.unregister_client_handler(kind, victim);
        }),
    );

    let order_b = order.clone();
    let victim = registry.register_client(
        kind,
        Box::new(move |_, _| {
            order_b.borrow_mut().push("b");
        }),
    );
    *victim_cell.borrow_mut() = Some(victim);

    registry.dispatch_client(kind, &MessageBuffer::new(kind));
    assert_eq!(*order.borrow(), vec!["a", "b"]);

    registry.dispatch_client(kind, &MessageBuffer::new(kind));
    assert_eq!(*order.borrow(), vec!["a", "b", "a"]);
}

#[test]
fn unregistering_an_unknown_handle_is_a_noop() {
    let mut registry = CallbackRegistry::new();
    let kind = MessageKind::from(4);

    let handle = registry.register_client(kind, Box::new(|_, _| {}));
    registry.unregister_client(kind, handle);
    // idempotent teardown: removing again must not error or disturb anything
    registry.unregister_client(kind, handle);
    registry.unregister_client(MessageKind::from(99), handle);

    assert_eq!(registry.client_handler_count(kind), 0);
}

#[test]
fn dispatch_only_reaches_the_matching_kind_bucket() {
    let mut registry = CallbackRegistry::new();
    let kind_a = MessageKind::from(10);
    let kind_b = MessageKind::from(11);
    let calls = Rc::new(RefCell::new(0u32));

    let calls_a = calls.clone();
    registry.register_client(
        kind_a,
        Box::new(move |_, _| {
            *calls_a.borrow_mut() += 1;
        }),
    );

    registry.dispatch_client(kind_b, &MessageBuffer::new(kind_b));
    assert_eq!(*calls.borrow(), 0);

    registry.dispatch_client(kind_a, &MessageBuffer::new(kind_a));
    assert_eq!(*calls.borrow(), 1);
}

#[test]
fn server_dispatch_passes_the_originating_slot() {
    let mut registry = CallbackRegistry::new();
    let kind = MessageKind::from(20);
    let sources = Rc::new(RefCell::new(Vec::new()));

    let sources_inner = sources.clone();
    registry.register_server(
        kind,
        Box::new(move |_, slot, _| {
            sources_inner.borrow_mut().push(slot);
        }),
    );

    registry.dispatch_server(kind, 3, &MessageBuffer::new(kind));
    registry.dispatch_server(kind, 0, &MessageBuffer::new(kind));
    assert_eq!(*sources.borrow(), vec![3, 0]);
}
