//! HTML content-model classification used by the editing algorithms.

/// Elements whose content model is "phrasing content" (inline level).
pub fn is_phrasing_tag(tag: &str) -> bool {
    matches!(
        tag,
        "a" | "abbr" | "area" | "audio" |
        "b" | "bdi" | "bdo" | "br" | "button" |
        "canvas" | "cite" | "code" |
        "data" | "datalist" | "del" | "dfn" |
        "em" | "embed" |
        "i" | "iframe" | "img" | "input" | "ins" |
        "kbd" | "keygen" |
        "label" |
        "map" | "mark" | "math" | "meter" |
        "noscript" |
        "object" | "output" |
        "progress" |
        "q" |
        "ruby" |
        "s" | "samp" | "script" | "select" | "small" | "span" | "strike" | "strong" | "sub" | "sup" | "svg" |
        "template" | "textarea" | "time" | "tt" |
        "u" |
        "var" | "video" |
        "wbr"
    )
}

/// Elements that never have children and serialize without an end tag.
pub fn is_void_tag(tag: &str) -> bool {
    matches!(
        tag,
        "area" | "base" | "br" | "col" | "embed" | "hr" | "img" | "input" | "link" | "meta" | "source"
            | "track" | "wbr"
    )
}
