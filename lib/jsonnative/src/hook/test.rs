use super::{invoke, HookError, HookKind, InvocationError};

#[test]
fn successful_hook() {
    assert_eq!(invoke(|| Ok::<_, HookError>(42)).unwrap(), 42);
}

#[test]
fn failing_hook() {
    let error = invoke(|| Err::<(), _>(HookError::new("no replacement")))
        .unwrap_err();

    assert!(matches!(error, InvocationError::Failed(_)));
    assert_eq!(
        error.to_string(),
        "the hook reported a failure: no replacement"
    );
}

#[test]
fn panicking_hook() {
    let error = invoke::<()>(|| panic!("boom")).unwrap_err();

    assert!(matches!(
        &error,
        InvocationError::Panicked(message) if message == "boom"
    ));
}

#[test]
fn panicking_hook_with_formatted_message() {
    let reason = "formatted";
    let error = invoke::<()>(|| panic!("{reason} boom")).unwrap_err();

    assert!(matches!(
        &error,
        InvocationError::Panicked(message) if message == "formatted boom"
    ));
}

#[test]
fn hook_names() {
    assert_eq!(HookKind::WriteReplace.to_string(), "write replacement");
    assert_eq!(HookKind::ReadResolve.to_string(), "read resolution");
}
