//! Internal helper macros.

/// Asserts that the given type is `Send` and `Sync`.
///
/// Types in the public API should be `Send` and `Sync` so that
/// applications can use them across threads even though this crate
/// itself doesn't use any.  This macro registers a static assertion
/// to that effect without any runtime cost.
macro_rules! assert_send_and_sync {
    ($x:ty where $($g:ident: $bound:path),*) => {
        const _: fn() = || {
            fn check<$($g: $bound),*>() {
                fn assert_send<T: Send>() {}
                fn assert_sync<T: Sync>() {}
                assert_send::<$x>();
                assert_sync::<$x>();
            }
        };
    };
    ($x:ty) => {
        const _: fn() = || {
            fn assert_send<T: Send>() {}
            fn assert_sync<T: Sync>() {}
            assert_send::<$x>();
            assert_sync::<$x>();
        };
    };
}
