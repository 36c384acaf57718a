use std::{ops::Deref, sync::Arc};

use jsonnative_adapter::{Json, TypeAdapterFactory, TypeToken};
use jsonnative_handler::Storage;
use serde::{Deserialize, Serialize};

use crate::{
    DenyList, Diagnostic, HookError, HookKind, NativeFactory, OnHookFailure,
    ReadResolve, WriteReplace,
};

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
struct Plain {
    value: i32,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
struct Base {
    value: i32,
}

impl WriteReplace for Base {
    type Replacement = i32;

    fn write_replace(&self) -> Result<i32, HookError> { Ok(self.value) }
}

impl ReadResolve for Base {
    fn read_resolve(&self) -> Result<Self, HookError> {
        Ok(Self { value: self.value.abs() })
    }
}

/// Shares all of `Base` through `Deref`, but is a type of its own.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
struct Derived(Base);

impl Deref for Derived {
    type Target = Base;

    fn deref(&self) -> &Base { &self.0 }
}

fn factory() -> NativeFactory {
    NativeFactory::builder().native::<Base>().build()
}

#[test]
fn no_hooks_no_adapter() {
    let json = Json::new();
    let factory = factory();

    assert!(factory.create(&json, &TypeToken::of::<Plain>()).is_none());
    assert!(factory.create(&json, &TypeToken::of::<String>()).is_none());
    assert!(!factory.is_registered(&TypeToken::of::<Plain>()));
}

#[test]
fn hooks_produce_adapter() {
    let json = Json::new();
    let factory = factory();

    let adapter = factory.create(&json, &TypeToken::of::<Base>()).unwrap();

    assert!(adapter.token().is::<Base>());
    assert!(adapter.downcast::<Base>().is_some());
    assert!(factory.is_registered(&TypeToken::of::<Base>()));
}

#[test]
fn single_hook_is_enough() {
    let json = Json::new();
    let write_only = NativeFactory::builder().write_replace::<Base>().build();
    let read_only = NativeFactory::builder().read_resolve::<Base>().build();

    assert!(write_only.create(&json, &TypeToken::of::<Base>()).is_some());
    assert!(read_only.create(&json, &TypeToken::of::<Base>()).is_some());
}

#[test]
fn lookup_is_exact_type_only() {
    let json = Json::builder().register_type_adapter_factory(factory()).build();

    assert!(factory().create(&json, &TypeToken::of::<Derived>()).is_none());

    // `Derived` is written and read with its own serde implementation: no
    // replacement on write, no resolution on read
    let derived = Derived(Base { value: -3 });

    assert_eq!(json.to_json(&derived).unwrap(), r#"{"value":-3}"#);
    assert_eq!(
        json.from_json::<Derived>(r#"{"value":-3}"#).unwrap(),
        Some(derived)
    );

    // while `Base` itself is adapted
    assert_eq!(json.to_json(&Base { value: -3 }).unwrap(), "-3");
    assert_eq!(
        json.from_json::<Base>(r#"{"value":-3}"#).unwrap(),
        Some(Base { value: 3 })
    );
}

#[test]
fn denied_hook_is_absent() {
    let json = Json::new();
    let diagnostics = Arc::new(Storage::<Diagnostic>::new());
    let factory = NativeFactory::builder()
        .read_resolve::<Base>()
        .access_policy(DenyList::new().deny::<Base>(HookKind::ReadResolve))
        .handler(diagnostics.clone())
        .build();

    assert!(factory.create(&json, &TypeToken::of::<Base>()).is_none());

    let diagnostics = diagnostics.as_vec();

    assert_eq!(diagnostics.len(), 1);
    assert_eq!(diagnostics[0].hook(), HookKind::ReadResolve);
    assert_eq!(diagnostics[0].type_name(), std::any::type_name::<Base>());

    let Diagnostic::AccessDenied { reason, .. } = &diagnostics[0] else {
        panic!("expected an access denial, got {:?}", diagnostics[0]);
    };

    assert_eq!(
        reason.reason(),
        format!(
            "the read resolution hook of `{}` is on the deny list",
            std::any::type_name::<Base>()
        )
    );
}

#[test]
fn denial_only_affects_one_hook() {
    let diagnostics = Arc::new(Storage::<Diagnostic>::new());
    let factory = NativeFactory::builder()
        .native::<Base>()
        .access_policy(DenyList::new().deny::<Base>(HookKind::WriteReplace))
        .handler(diagnostics.clone())
        .build();
    let json = Json::builder().register_type_adapter_factory(factory).build();

    // written as is, since the replacement is denied
    assert_eq!(json.to_json(&Base { value: -8 }).unwrap(), r#"{"value":-8}"#);

    // still resolved
    assert_eq!(
        json.from_json::<Base>(r#"{"value":-8}"#).unwrap(),
        Some(Base { value: 8 })
    );

    assert_eq!(diagnostics.as_vec().len(), 1);
    assert_eq!(diagnostics.as_vec()[0].hook(), HookKind::WriteReplace);
}

#[test]
fn hooks_are_probed_once_per_type() {
    let diagnostics = Arc::new(Storage::<Diagnostic>::new());
    let factory = NativeFactory::builder()
        .native::<Base>()
        .access_policy(DenyList::new().deny::<Base>(HookKind::WriteReplace))
        .handler(diagnostics.clone())
        .build();
    let json = Json::builder().register_type_adapter_factory(factory).build();

    for value in 0..3 {
        json.to_json(&Base { value }).unwrap();
    }

    // the denial is reported when the adapter is created, not on every use
    assert_eq!(diagnostics.as_vec().len(), 1);
}

#[test]
fn denial_is_reported_once_per_hook() {
    let json = Json::new();
    let diagnostics = Arc::new(Storage::<Diagnostic>::new());
    let factory = NativeFactory::builder()
        .native::<Base>()
        .access_policy(
            DenyList::new()
                .deny::<Base>(HookKind::WriteReplace)
                .deny::<Base>(HookKind::ReadResolve),
        )
        .handler(diagnostics.clone())
        .build();

    // as when threads miss the cache together, or a delegate is requested
    // more than once
    for _ in 0..3 {
        assert!(factory.create(&json, &TypeToken::of::<Base>()).is_none());
    }

    let diagnostics = diagnostics.as_vec();

    assert_eq!(diagnostics.len(), 2);
    assert_eq!(diagnostics[0].hook(), HookKind::WriteReplace);
    assert_eq!(diagnostics[1].hook(), HookKind::ReadResolve);
}

#[test]
fn builder_configuration() {
    let factory = NativeFactory::builder().build();

    assert_eq!(factory.on_hook_failure(), OnHookFailure::UseOriginalValue);

    let factory = NativeFactory::builder()
        .on_hook_failure(OnHookFailure::Propagate)
        .build();

    assert_eq!(factory.on_hook_failure(), OnHookFailure::Propagate);
}
