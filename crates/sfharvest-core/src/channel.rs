use std::collections::BTreeSet;
use std::sync::LazyLock;

use regex::Regex;

use crate::products::ProductTag;

static UNSAFE_PATH_CHARS: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"[^a-zA-Z0-9가-힣_-]").expect("unsafe path char regex is valid")
});

/// Product ids the storefront marks as best-selling or newly listed.
///
/// Snapshot taken once at resolution time; never refreshed during a run.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct SpecialProductIds {
    pub best: BTreeSet<i64>,
    pub new: BTreeSet<i64>,
}

impl SpecialProductIds {
    #[must_use]
    pub fn new(best: impl IntoIterator<Item = i64>, new: impl IntoIterator<Item = i64>) -> Self {
        Self {
            best: best.into_iter().collect(),
            new: new.into_iter().collect(),
        }
    }

    /// Tags for a product id, `BEST` first.
    #[must_use]
    pub fn tags_for(&self, id: i64) -> Vec<ProductTag> {
        let mut tags = Vec::with_capacity(2);
        if self.best.contains(&id) {
            tags.push(ProductTag::Best);
        }
        if self.new.contains(&id) {
            tags.push(ProductTag::New);
        }
        tags
    }
}

/// Resolved addressing for one storefront.
///
/// `channel_uid` addresses the listing API; `channel_name` names the
/// persistent store.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ChannelInfo {
    pub channel_uid: String,
    pub channel_name: String,
    pub special: SpecialProductIds,
}

impl ChannelInfo {
    /// Channel name made safe for use as a single file-name segment.
    #[must_use]
    pub fn store_name(&self) -> String {
        sanitize_channel_name(&self.channel_name)
    }
}

/// Replaces every character outside ASCII letters, digits, Hangul syllables,
/// `_` and `-` with `_`.
#[must_use]
pub fn sanitize_channel_name(name: &str) -> String {
    UNSAFE_PATH_CHARS.replace_all(name, "_").into_owned()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn tags_for_orders_best_before_new() {
        let special = SpecialProductIds::new([7, 8], [8, 9]);
        assert_eq!(
            special.tags_for(8),
            vec![ProductTag::Best, ProductTag::New]
        );
        assert_eq!(special.tags_for(7), vec![ProductTag::Best]);
        assert_eq!(special.tags_for(9), vec![ProductTag::New]);
        assert!(special.tags_for(10).is_empty());
    }

    #[test]
    fn sanitize_keeps_hangul_and_safe_ascii() {
        assert_eq!(sanitize_channel_name("동스마켓_shop-01"), "동스마켓_shop-01");
    }

    #[test]
    fn sanitize_replaces_separators_and_spaces() {
        assert_eq!(sanitize_channel_name("../etc/passwd"), "___etc_passwd");
        assert_eq!(sanitize_channel_name("My Shop!"), "My_Shop_");
        assert_eq!(sanitize_channel_name(r"a\b.c"), "a_b_c");
    }

    #[test]
    fn store_name_uses_sanitized_channel_name() {
        let info = ChannelInfo {
            channel_uid: "2sWDw6fEMsGdGhBLcfaXj".to_string(),
            channel_name: "Bean Shop".to_string(),
            special: SpecialProductIds::default(),
        };
        assert_eq!(info.store_name(), "Bean_Shop");
    }
}
