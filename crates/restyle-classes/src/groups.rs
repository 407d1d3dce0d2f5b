//! Utility conflict groups.
//!
//! Maps a bare utility name (no modifiers, no markers) to the group of
//! utilities that set the same CSS property. Two classes in the same group
//! and scope cannot both survive a merge.

/// A conflict group and the groups it overrides when it wins.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ClassGroup {
    /// Group identifier (e.g. `font-size`, `px`).
    pub id: &'static str,

    /// Narrower groups claimed along with this one (`p` claims `px`, `pt`...).
    pub shadows: &'static [&'static str],
}

impl ClassGroup {
    fn of(id: &'static str) -> Self {
        Self {
            id,
            shadows: shadows_of(id),
        }
    }
}

/// Utilities recognised by their full name.
const EXACT: &[(&str, &str)] = &[
    ("block", "display"),
    ("inline-block", "display"),
    ("inline", "display"),
    ("flex", "display"),
    ("inline-flex", "display"),
    ("grid", "display"),
    ("inline-grid", "display"),
    ("table", "display"),
    ("table-row", "display"),
    ("table-cell", "display"),
    ("contents", "display"),
    ("flow-root", "display"),
    ("list-item", "display"),
    ("hidden", "display"),
    ("static", "position"),
    ("fixed", "position"),
    ("absolute", "position"),
    ("relative", "position"),
    ("sticky", "position"),
    ("visible", "visibility"),
    ("invisible", "visibility"),
    ("collapse", "visibility"),
    ("italic", "font-style"),
    ("not-italic", "font-style"),
    ("uppercase", "text-transform"),
    ("lowercase", "text-transform"),
    ("capitalize", "text-transform"),
    ("normal-case", "text-transform"),
    ("underline", "text-decoration-line"),
    ("overline", "text-decoration-line"),
    ("line-through", "text-decoration-line"),
    ("no-underline", "text-decoration-line"),
    ("truncate", "text-overflow"),
    ("antialiased", "font-smoothing"),
    ("subpixel-antialiased", "font-smoothing"),
    ("sr-only", "sr"),
    ("not-sr-only", "sr"),
    ("isolate", "isolation"),
    ("isolation-auto", "isolation"),
    ("box-border", "box-sizing"),
    ("box-content", "box-sizing"),
    ("container", "container"),
    ("border", "border-w"),
    ("border-x", "border-w-x"),
    ("border-y", "border-w-y"),
    ("border-s", "border-w-s"),
    ("border-e", "border-w-e"),
    ("border-t", "border-w-t"),
    ("border-r", "border-w-r"),
    ("border-b", "border-w-b"),
    ("border-l", "border-w-l"),
    ("rounded", "rounded"),
    ("rounded-s", "rounded-s"),
    ("rounded-e", "rounded-e"),
    ("rounded-t", "rounded-t"),
    ("rounded-r", "rounded-r"),
    ("rounded-b", "rounded-b"),
    ("rounded-l", "rounded-l"),
    ("rounded-ss", "rounded-ss"),
    ("rounded-se", "rounded-se"),
    ("rounded-es", "rounded-es"),
    ("rounded-ee", "rounded-ee"),
    ("rounded-tl", "rounded-tl"),
    ("rounded-tr", "rounded-tr"),
    ("rounded-br", "rounded-br"),
    ("rounded-bl", "rounded-bl"),
    ("divide-x", "divide-x"),
    ("divide-y", "divide-y"),
    ("outline", "outline-style"),
    ("ring", "ring-w"),
    ("ring-inset", "ring-inset"),
    ("shadow", "shadow"),
    ("transition", "transition"),
    ("grow", "grow"),
    ("shrink", "shrink"),
    ("resize", "resize"),
    ("blur", "blur"),
    ("grayscale", "grayscale"),
    ("invert", "invert"),
    ("sepia", "sepia"),
    ("drop-shadow", "drop-shadow"),
    ("col-auto", "grid-column"),
    ("row-auto", "grid-row"),
];

/// Prefixes whose value never changes the group. Checked in order.
const PREFIXES: &[(&str, &str)] = &[
    ("px-", "px"),
    ("py-", "py"),
    ("ps-", "ps"),
    ("pe-", "pe"),
    ("pt-", "pt"),
    ("pr-", "pr"),
    ("pb-", "pb"),
    ("pl-", "pl"),
    ("p-", "p"),
    ("mx-", "mx"),
    ("my-", "my"),
    ("ms-", "ms"),
    ("me-", "me"),
    ("mt-", "mt"),
    ("mr-", "mr"),
    ("mb-", "mb"),
    ("ml-", "ml"),
    ("m-", "m"),
    ("min-w-", "min-w"),
    ("min-h-", "min-h"),
    ("max-w-", "max-w"),
    ("max-h-", "max-h"),
    ("size-", "size"),
    ("w-", "w"),
    ("h-", "h"),
    ("gap-x-", "gap-x"),
    ("gap-y-", "gap-y"),
    ("gap-", "gap"),
    ("inset-x-", "inset-x"),
    ("inset-y-", "inset-y"),
    ("inset-", "inset"),
    ("top-", "top"),
    ("right-", "right"),
    ("bottom-", "bottom"),
    ("left-", "left"),
    ("start-", "start"),
    ("end-", "end"),
    ("z-", "z"),
    ("order-", "order"),
    ("opacity-", "opacity"),
    ("basis-", "basis"),
    ("grow-", "grow"),
    ("shrink-", "shrink"),
    ("items-", "align-items"),
    ("justify-items-", "justify-items"),
    ("justify-self-", "justify-self"),
    ("justify-", "justify-content"),
    ("content-", "align-content"),
    ("self-", "align-self"),
    ("place-content-", "place-content"),
    ("place-items-", "place-items"),
    ("place-self-", "place-self"),
    ("grid-cols-", "grid-cols"),
    ("grid-rows-", "grid-rows"),
    ("grid-flow-", "grid-flow"),
    ("auto-cols-", "auto-cols"),
    ("auto-rows-", "auto-rows"),
    ("col-span-", "grid-column"),
    ("col-start-", "col-start"),
    ("col-end-", "col-end"),
    ("row-span-", "grid-row"),
    ("row-start-", "row-start"),
    ("row-end-", "row-end"),
    ("leading-", "leading"),
    ("tracking-", "tracking"),
    ("whitespace-", "whitespace"),
    ("break-after-", "break-after"),
    ("break-before-", "break-before"),
    ("break-inside-", "break-inside"),
    ("break-", "word-break"),
    ("line-clamp-", "line-clamp"),
    ("indent-", "indent"),
    ("align-", "vertical-align"),
    ("underline-offset-", "underline-offset"),
    ("outline-offset-", "outline-offset"),
    ("overflow-x-", "overflow-x"),
    ("overflow-y-", "overflow-y"),
    ("overflow-", "overflow"),
    ("overscroll-x-", "overscroll-x"),
    ("overscroll-y-", "overscroll-y"),
    ("overscroll-", "overscroll"),
    ("cursor-", "cursor"),
    ("select-", "user-select"),
    ("pointer-events-", "pointer-events"),
    ("resize-", "resize"),
    ("touch-", "touch"),
    ("appearance-", "appearance"),
    ("caret-", "caret-color"),
    ("accent-", "accent-color"),
    ("will-change-", "will-change"),
    ("fill-", "fill"),
    ("aspect-", "aspect"),
    ("columns-", "columns"),
    ("float-", "float"),
    ("clear-", "clear"),
    ("mix-blend-", "mix-blend"),
    ("box-decoration-", "box-decoration"),
    ("from-", "gradient-from"),
    ("via-", "gradient-via"),
    ("to-", "gradient-to"),
    ("transition-", "transition"),
    ("duration-", "duration"),
    ("ease-", "ease"),
    ("delay-", "delay"),
    ("animate-", "animate"),
    ("scale-x-", "scale-x"),
    ("scale-y-", "scale-y"),
    ("scale-", "scale"),
    ("rotate-", "rotate"),
    ("translate-x-", "translate-x"),
    ("translate-y-", "translate-y"),
    ("skew-x-", "skew-x"),
    ("skew-y-", "skew-y"),
    ("origin-", "transform-origin"),
    ("blur-", "blur"),
    ("brightness-", "brightness"),
    ("contrast-", "contrast"),
    ("saturate-", "saturate"),
    ("hue-rotate-", "hue-rotate"),
    ("drop-shadow-", "drop-shadow"),
    ("backdrop-blur-", "backdrop-blur"),
    ("divide-x-", "divide-x"),
    ("divide-y-", "divide-y"),
];

const FONT_SIZES: &[&str] = &[
    "xs", "sm", "base", "lg", "xl", "2xl", "3xl", "4xl", "5xl", "6xl", "7xl", "8xl", "9xl",
];

const FONT_WEIGHTS: &[&str] = &[
    "thin",
    "extralight",
    "light",
    "normal",
    "medium",
    "semibold",
    "bold",
    "extrabold",
    "black",
];

const TEXT_ALIGN: &[&str] = &["left", "center", "right", "justify", "start", "end"];
const TEXT_WRAP: &[&str] = &["wrap", "nowrap", "balance", "pretty"];
const LINE_STYLES: &[&str] = &["solid", "dashed", "dotted", "double", "hidden", "none"];
const SHADOW_SIZES: &[&str] = &["sm", "md", "lg", "xl", "2xl", "inner", "none"];

/// (side prefix, width group, color group) for per-side borders.
const BORDER_SIDES: &[(&str, &str, &str)] = &[
    ("x", "border-w-x", "border-color-x"),
    ("y", "border-w-y", "border-color-y"),
    ("s", "border-w-s", "border-color-s"),
    ("e", "border-w-e", "border-color-e"),
    ("t", "border-w-t", "border-color-t"),
    ("r", "border-w-r", "border-color-r"),
    ("b", "border-w-b", "border-color-b"),
    ("l", "border-w-l", "border-color-l"),
];

/// Corner prefixes come before side prefixes so `rounded-tl-lg` is not read as `rounded-t`.
const ROUNDED_SIDES: &[(&str, &str)] = &[
    ("tl", "rounded-tl"),
    ("tr", "rounded-tr"),
    ("br", "rounded-br"),
    ("bl", "rounded-bl"),
    ("ss", "rounded-ss"),
    ("se", "rounded-se"),
    ("es", "rounded-es"),
    ("ee", "rounded-ee"),
    ("t", "rounded-t"),
    ("r", "rounded-r"),
    ("b", "rounded-b"),
    ("l", "rounded-l"),
    ("s", "rounded-s"),
    ("e", "rounded-e"),
];

const FONT_SIZE_WITH_LEADING: ClassGroup = ClassGroup {
    id: "font-size",
    shadows: &["leading"],
};

fn shadows_of(id: &str) -> &'static [&'static str] {
    match id {
        "p" => &["px", "py", "ps", "pe", "pt", "pr", "pb", "pl"],
        "px" => &["pr", "pl"],
        "py" => &["pt", "pb"],
        "m" => &["mx", "my", "ms", "me", "mt", "mr", "mb", "ml"],
        "mx" => &["mr", "ml"],
        "my" => &["mt", "mb"],
        "inset" => &[
            "inset-x", "inset-y", "start", "end", "top", "right", "bottom", "left",
        ],
        "inset-x" => &["right", "left"],
        "inset-y" => &["top", "bottom"],
        "size" => &["w", "h"],
        "gap" => &["gap-x", "gap-y"],
        "overflow" => &["overflow-x", "overflow-y"],
        "overscroll" => &["overscroll-x", "overscroll-y"],
        "scale" => &["scale-x", "scale-y"],
        "rounded" => &[
            "rounded-s",
            "rounded-e",
            "rounded-t",
            "rounded-r",
            "rounded-b",
            "rounded-l",
            "rounded-ss",
            "rounded-se",
            "rounded-ee",
            "rounded-es",
            "rounded-tl",
            "rounded-tr",
            "rounded-br",
            "rounded-bl",
        ],
        "rounded-s" => &["rounded-ss", "rounded-es"],
        "rounded-e" => &["rounded-se", "rounded-ee"],
        "rounded-t" => &["rounded-tl", "rounded-tr"],
        "rounded-r" => &["rounded-tr", "rounded-br"],
        "rounded-b" => &["rounded-br", "rounded-bl"],
        "rounded-l" => &["rounded-tl", "rounded-bl"],
        "border-w" => &[
            "border-w-x",
            "border-w-y",
            "border-w-s",
            "border-w-e",
            "border-w-t",
            "border-w-r",
            "border-w-b",
            "border-w-l",
        ],
        "border-w-x" => &["border-w-r", "border-w-l"],
        "border-w-y" => &["border-w-t", "border-w-b"],
        "border-color" => &[
            "border-color-x",
            "border-color-y",
            "border-color-s",
            "border-color-e",
            "border-color-t",
            "border-color-r",
            "border-color-b",
            "border-color-l",
        ],
        "border-color-x" => &["border-color-r", "border-color-l"],
        "border-color-y" => &["border-color-t", "border-color-b"],
        _ => &[],
    }
}

/// Find the conflict group of a bare utility. `None` means the class is not
/// a known utility and only conflicts with exact duplicates of itself.
pub fn group_of(utility: &str) -> Option<ClassGroup> {
    if utility.is_empty() {
        return None;
    }

    if let Some((_, id)) = EXACT.iter().find(|(name, _)| *name == utility) {
        return Some(ClassGroup::of(*id));
    }

    if let Some(value) = utility.strip_prefix("text-") {
        return text_group(value);
    }
    if let Some(value) = utility.strip_prefix("font-") {
        let id = if FONT_WEIGHTS.contains(&value) {
            "font-weight"
        } else {
            "font-family"
        };
        return Some(ClassGroup::of(id));
    }
    if let Some(value) = utility.strip_prefix("border-") {
        return Some(ClassGroup::of(border_group(value)));
    }
    if let Some(value) = utility.strip_prefix("rounded-") {
        return Some(ClassGroup::of(rounded_group(value)));
    }
    if let Some(value) = utility.strip_prefix("bg-") {
        return Some(ClassGroup::of(bg_group(value)));
    }
    if let Some(value) = utility.strip_prefix("flex-") {
        let id = match value {
            "row" | "row-reverse" | "col" | "col-reverse" => "flex-direction",
            "wrap" | "wrap-reverse" | "nowrap" => "flex-wrap",
            _ => "flex",
        };
        return Some(ClassGroup::of(id));
    }
    if let Some(value) = utility.strip_prefix("shadow-") {
        let id = if SHADOW_SIZES.contains(&value) {
            "shadow"
        } else {
            "shadow-color"
        };
        return Some(ClassGroup::of(id));
    }
    if let Some(value) = utility.strip_prefix("ring-offset-") {
        let id = if is_width(value) {
            "ring-offset-w"
        } else {
            "ring-offset-color"
        };
        return Some(ClassGroup::of(id));
    }
    if let Some(value) = utility.strip_prefix("ring-") {
        let id = if is_width(value) { "ring-w" } else { "ring-color" };
        return Some(ClassGroup::of(id));
    }
    if let Some(value) = utility.strip_prefix("outline-") {
        if !value.starts_with("offset-") {
            let id = if is_width(value) {
                "outline-w"
            } else if LINE_STYLES.contains(&value) {
                "outline-style"
            } else {
                "outline-color"
            };
            return Some(ClassGroup::of(id));
        }
    }
    if let Some(value) = utility.strip_prefix("decoration-") {
        let id = match value {
            "solid" | "double" | "dotted" | "dashed" | "wavy" => "decoration-style",
            "auto" | "from-font" => "decoration-thickness",
            v if is_width(v) => "decoration-thickness",
            _ => "decoration-color",
        };
        return Some(ClassGroup::of(id));
    }
    if let Some(value) = utility.strip_prefix("stroke-") {
        let id = if is_width(value) { "stroke-w" } else { "stroke" };
        return Some(ClassGroup::of(id));
    }
    if let Some(value) = utility.strip_prefix("object-") {
        let id = match value {
            "contain" | "cover" | "fill" | "none" | "scale-down" => "object-fit",
            _ => "object-position",
        };
        return Some(ClassGroup::of(id));
    }
    if let Some(value) = utility.strip_prefix("list-") {
        let id = match value {
            "inside" | "outside" => "list-position",
            _ => "list-type",
        };
        return Some(ClassGroup::of(id));
    }
    if let Some(value) = utility.strip_prefix("space-x-") {
        let id = if value == "reverse" {
            "space-x-reverse"
        } else {
            "space-x"
        };
        return Some(ClassGroup::of(id));
    }
    if let Some(value) = utility.strip_prefix("space-y-") {
        let id = if value == "reverse" {
            "space-y-reverse"
        } else {
            "space-y"
        };
        return Some(ClassGroup::of(id));
    }
    if let Some(value) = utility.strip_prefix("divide-") {
        if !value.starts_with("x-") && !value.starts_with("y-") {
            let id = if LINE_STYLES.contains(&value) {
                "divide-style"
            } else {
                "divide-color"
            };
            return Some(ClassGroup::of(id));
        }
    }

    PREFIXES
        .iter()
        .find_map(|(prefix, id)| {
            utility
                .strip_prefix(prefix)
                .filter(|value| !value.is_empty())
                .map(|_| ClassGroup::of(*id))
        })
}

fn text_group(value: &str) -> Option<ClassGroup> {
    if value.is_empty() {
        return None;
    }

    // `text-sm/6` sets both font size and line height
    let (size, line_height) = match value.split_once('/') {
        Some((size, _)) if !is_arbitrary(value) => (size, true),
        _ => (value, false),
    };

    if FONT_SIZES.contains(&size) || is_arbitrary_length(size) {
        return Some(if line_height {
            FONT_SIZE_WITH_LEADING
        } else {
            ClassGroup::of("font-size")
        });
    }

    let id = if TEXT_ALIGN.contains(&value) {
        "text-align"
    } else if TEXT_WRAP.contains(&value) {
        "text-wrap"
    } else if value == "ellipsis" || value == "clip" {
        "text-overflow"
    } else {
        "text-color"
    };
    Some(ClassGroup::of(id))
}

fn border_group(value: &str) -> &'static str {
    for (side, width_id, color_id) in BORDER_SIDES {
        if let Some(side_value) = value.strip_prefix(side).and_then(|v| v.strip_prefix('-')) {
            return if is_width(side_value) {
                *width_id
            } else {
                *color_id
            };
        }
    }

    match value {
        v if LINE_STYLES.contains(&v) => "border-style",
        "collapse" | "separate" => "border-collapse",
        v if v.starts_with("spacing") => "border-spacing",
        v if is_width(v) => "border-w",
        _ => "border-color",
    }
}

fn rounded_group(value: &str) -> &'static str {
    ROUNDED_SIDES
        .iter()
        .find(|(side, _)| {
            value
                .strip_prefix(side)
                .is_some_and(|rest| rest.starts_with('-'))
        })
        .map(|(_, id)| *id)
        .unwrap_or("rounded")
}

fn bg_group(value: &str) -> &'static str {
    if value.starts_with("blend-") {
        return "bg-blend";
    }
    if value.starts_with("clip-") {
        return "bg-clip";
    }
    if value.starts_with("origin-") {
        return "bg-origin";
    }
    if value.starts_with("opacity-") {
        return "bg-opacity";
    }
    if value.starts_with("gradient-to-")
        || value.starts_with("linear-")
        || value.starts_with("radial-")
        || value.starts_with("conic-")
        || value.starts_with("[url(")
    {
        return "bg-image";
    }

    match value {
        "fixed" | "local" | "scroll" => "bg-attachment",
        "bottom" | "center" | "left" | "left-bottom" | "left-top" | "right" | "right-bottom"
        | "right-top" | "top" => "bg-position",
        "repeat" | "no-repeat" | "repeat-x" | "repeat-y" | "repeat-round" | "repeat-space" => {
            "bg-repeat"
        }
        "auto" | "cover" | "contain" => "bg-size",
        "none" => "bg-image",
        v if v.starts_with("[length:") || v.starts_with("[size:") => "bg-size",
        v if v.starts_with("[position:") => "bg-position",
        _ => "bg-color",
    }
}

fn is_number(value: &str) -> bool {
    !value.is_empty()
        && value.chars().all(|c| c.is_ascii_digit() || c == '.')
        && value.chars().any(|c| c.is_ascii_digit())
}

fn is_arbitrary(value: &str) -> bool {
    value.len() > 2 && value.starts_with('[') && value.ends_with(']')
}

fn is_arbitrary_length(value: &str) -> bool {
    if !is_arbitrary(value) {
        return false;
    }
    let inner = &value[1..value.len() - 1];
    inner.starts_with("length:")
        || inner.starts_with("calc(")
        || inner.starts_with(|c: char| c.is_ascii_digit() || c == '.')
}

/// Border, ring, outline and stroke widths: bare numbers, `px` or an arbitrary length.
fn is_width(value: &str) -> bool {
    is_number(value) || value == "px" || is_arbitrary_length(value)
}
