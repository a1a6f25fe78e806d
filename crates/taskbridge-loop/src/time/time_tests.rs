#![allow(non_snake_case)]

use super::*;
use crate::{EventLoop, HostErrorKind, Interpreter};
use std::thread;

#[test]
fn sleep___inside_loop___waits_at_least_duration() {
    let mut event_loop = EventLoop::new(Interpreter::new());
    let start = Instant::now();

    event_loop
        .run_until_complete(sleep(Duration::from_millis(25)))
        .unwrap();

    assert!(start.elapsed() >= Duration::from_millis(25));
}

#[test]
fn sleep___zero_duration___completes_immediately() {
    let mut event_loop = EventLoop::new(Interpreter::new());

    let result = event_loop.run_until_complete(sleep(Duration::ZERO));

    assert!(result.is_ok());
}

#[test]
#[should_panic(expected = "outside of a running EventLoop")]
fn sleep___outside_loop___panics() {
    let waker = std::task::Waker::noop();
    let mut cx = Context::from_waker(waker);
    let mut pending = sleep(Duration::from_secs(60));

    let _ = Pin::new(&mut pending).poll(&mut cx);
}

#[test]
fn timeout___expires___cancels_future_and_returns_timeout_error() {
    let mut event_loop = EventLoop::new(Interpreter::new());
    let future = event_loop.handle().create_future();

    let outcome = event_loop
        .run_until_complete(timeout(Duration::from_millis(20), future.clone()))
        .unwrap();

    let interpreter = event_loop.handle().interpreter().clone();
    let token = interpreter.acquire();
    assert_eq!(outcome.unwrap_err().kind(), &HostErrorKind::TimeoutError);
    assert!(future.is_cancelled(&token));
}

#[test]
fn timeout___future_resolves_first___returns_value() {
    let mut event_loop = EventLoop::new(Interpreter::new());
    let handle = event_loop.handle();
    let future = handle.create_future();

    let remote_handle = handle.clone();
    let remote_future = future.clone();
    let worker = thread::spawn(move || {
        thread::sleep(Duration::from_millis(10));
        remote_handle.call_soon_threadsafe(move |token| {
            remote_future.set_result(token, HostValue::Int(1)).unwrap();
        });
    });

    let outcome = event_loop
        .run_until_complete(timeout(Duration::from_secs(5), future))
        .unwrap();
    worker.join().unwrap();

    assert_eq!(outcome, Ok(HostValue::Int(1)));
}

#[test]
fn sleep___unrepresentable_deadline___stays_pending() {
    let mut event_loop = EventLoop::new(Interpreter::new());

    let outcome = event_loop
        .run_until_complete(async {
            let mut forever = std::pin::pin!(sleep(Duration::MAX));
            std::future::poll_fn(|cx| Poll::Ready(forever.as_mut().poll(cx).is_pending())).await
        })
        .unwrap();

    assert!(outcome);
}

#[test]
fn timeout___max_duration___waits_for_resolution() {
    let mut event_loop = EventLoop::new(Interpreter::new());
    let handle = event_loop.handle();
    let future = handle.create_future();

    let remote_future = future.clone();
    handle.call_soon_threadsafe(move |token| {
        remote_future.set_result(token, HostValue::Int(3)).unwrap();
    });
    let outcome = event_loop
        .run_until_complete(timeout(Duration::MAX, future))
        .unwrap();

    assert_eq!(outcome, Ok(HostValue::Int(3)));
}
