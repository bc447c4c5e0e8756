/// Declare hard-coded 4-byte method selectors.
///
/// Each entry becomes a `pub const NAME: Selector` and is listed, with its
/// canonical signature, in a `pub const KNOWN_SELECTORS` table so the
/// constants can be audited against the keccak of their signature in tests.
/// The selectors are never derived at runtime.
#[macro_export]
macro_rules! selectors {
    ($(
        $(#[$meta:meta])*
        $name:ident = $signature:literal => [$b0:literal, $b1:literal, $b2:literal, $b3:literal];
    )+) => {
        $(
            $(#[$meta])*
            #[doc = concat!("`", $signature, "`")]
            pub const $name: $crate::abi::Selector = [$b0, $b1, $b2, $b3];
        )+

        /// Every selector declared in this module with its canonical signature
        pub const KNOWN_SELECTORS: &[(&str, $crate::abi::Selector)] = &[
            $(($signature, $name),)+
        ];
    };
}

/// Return `None` from the enclosing function, emitting a `DEBUG` level
/// tracing event with the reason.
#[macro_export]
macro_rules! refuse {
    ($($arg:tt)+) => {{
        tracing::debug!($($arg)+);
        return None;
    }};
}
