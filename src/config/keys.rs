//! Reserved configuration keys
//!
//! Reserved keys carry structure (defaults, rules, strategy, i18n...) rather
//! than classes, and each has its own combination rule in the tree merger.

pub const I18N: &str = "i18n";
pub const DEFAULTS: &str = "defaults";
pub const STRATEGY: &str = "strategy";
pub const SAFELIST: &str = "safelist";
pub const SAFELIST_COLORS: &str = "safelistColors";
pub const COMPONENT: &str = "component";
pub const DEFAULT_VARIANTS: &str = "defaultVariants";
pub const COMPOUND_VARIANTS: &str = "compoundVariants";

/// Key whose sub-tree holds variant dimensions.
pub const VARIANTS: &str = "variants";

/// Keys whose presence makes an object a variant node.
pub const VARIANT_KEYS: &[&str] = &["base", VARIANTS, COMPOUND_VARIANTS, DEFAULT_VARIANTS];

/// Closed set of reserved keys.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ReservedKey {
    I18n,
    Defaults,
    Strategy,
    Safelist,
    SafelistColors,
    Component,
    DefaultVariants,
    CompoundVariants,
    /// Any key containing `transition`, case-insensitive.
    Transition,
}

impl ReservedKey {
    /// Classify a key. `None` means an ordinary style key.
    pub fn classify(key: &str) -> Option<Self> {
        let reserved = match key {
            I18N => Self::I18n,
            DEFAULTS => Self::Defaults,
            STRATEGY => Self::Strategy,
            SAFELIST => Self::Safelist,
            SAFELIST_COLORS => Self::SafelistColors,
            COMPONENT => Self::Component,
            DEFAULT_VARIANTS => Self::DefaultVariants,
            COMPOUND_VARIANTS => Self::CompoundVariants,
            _ if key.to_ascii_lowercase().contains("transition") => Self::Transition,
            _ => return None,
        };
        Some(reserved)
    }

    /// Reserved keys that may never come from instance configuration.
    pub fn is_instance_forbidden(self) -> bool {
        matches!(self, Self::Safelist | Self::SafelistColors)
    }

    /// Reserved keys that may never come from global configuration.
    pub fn is_global_forbidden(self) -> bool {
        matches!(self, Self::Component)
    }
}

/// Whether `key` is reserved.
pub fn is_reserved_key(key: &str) -> bool {
    ReservedKey::classify(key).is_some()
}
