//! Post records as stored by the archive, and their rendered view.

use std::collections::HashMap;
use std::fmt;
use std::str::FromStr;

use kako_tripcode::{SecureSalt, parse_name};
use serde::{Deserialize, Serialize};

use crate::backlinks::Backlink;
use crate::hooks::{CleanContext, Hooks};
use crate::sanitize::escape_html;

/// Identifier of a post within a board.
///
/// Canonical posts have `subnum == 0`. Ghost posts (added by the archive
/// after the thread was pruned upstream) share `num` with the post they
/// follow and carry a non-zero `subnum`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Default)]
pub struct PostId {
    pub num: u64,
    pub subnum: u64,
}

impl PostId {
    #[must_use]
    pub const fn new(num: u64, subnum: u64) -> Self {
        Self { num, subnum }
    }

    /// Identifier of a canonical (non-ghost) post.
    #[must_use]
    pub const fn canonical(num: u64) -> Self {
        Self { num, subnum: 0 }
    }

    #[must_use]
    pub const fn is_ghost(&self) -> bool {
        self.subnum != 0
    }

    /// Token used in anchors and registry keys: `123` or `123_4`.
    #[must_use]
    pub fn underscore(&self) -> String {
        if self.is_ghost() {
            format!("{}_{}", self.num, self.subnum)
        } else {
            self.num.to_string()
        }
    }
}

/// Displays the token authors type in quotes: `123` or `123,4`.
impl fmt::Display for PostId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        if self.is_ghost() {
            write!(f, "{},{}", self.num, self.subnum)
        } else {
            write!(f, "{}", self.num)
        }
    }
}

/// Error parsing a post token.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
#[error("invalid post token: {0:?}")]
pub struct ParsePostIdError(String);

impl FromStr for PostId {
    type Err = ParsePostIdError;

    /// Accepts `N`, `N,S` and `N_S`.
    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let err = || ParsePostIdError(s.to_owned());
        let (num, subnum) = match s.split_once([',', '_']) {
            Some((num, subnum)) => (num, Some(subnum)),
            None => (s, None),
        };

        let num = num.parse().map_err(|_| err())?;
        let subnum = match subnum {
            Some(subnum) => subnum.parse().map_err(|_| err())?,
            None => 0,
        };

        Ok(Self { num, subnum })
    }
}

/// Staff capcode a post was made with.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(from = "String", into = "String")]
pub enum Capcode {
    #[default]
    None,
    Mod,
    GlobalMod,
    Admin,
    Developer,
}

impl Capcode {
    /// Single-letter code stored by the archive.
    #[must_use]
    pub const fn code(self) -> &'static str {
        match self {
            Self::None => "N",
            Self::Mod => "M",
            Self::GlobalMod => "G",
            Self::Admin => "A",
            Self::Developer => "D",
        }
    }

    /// Parse a stored code. Unknown codes are treated as no capcode.
    #[must_use]
    pub fn from_code(code: &str) -> Self {
        match code {
            "M" => Self::Mod,
            "G" => Self::GlobalMod,
            "A" => Self::Admin,
            "D" => Self::Developer,
            _ => Self::None,
        }
    }
}

impl From<String> for Capcode {
    fn from(code: String) -> Self {
        Self::from_code(&code)
    }
}

impl From<Capcode> for String {
    fn from(capcode: Capcode) -> Self {
        capcode.code().to_owned()
    }
}

/// Board a post belongs to.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Board {
    pub shortname: String,
    #[serde(default)]
    pub name: String,
    /// Whether the board mirrors an upstream board. Enables the staff-only
    /// markup tags for canonical posts.
    #[serde(default)]
    pub archive: bool,
}

impl Board {
    #[must_use]
    pub fn new(shortname: impl Into<String>) -> Self {
        Self {
            shortname: shortname.into(),
            name: String::new(),
            archive: false,
        }
    }

    #[must_use]
    pub fn with_name(mut self, name: impl Into<String>) -> Self {
        self.name = name.into();
        self
    }

    #[must_use]
    pub fn with_archive(mut self, archive: bool) -> Self {
        self.archive = archive;
        self
    }
}

/// A stored post.
#[derive(Debug, Clone, Default, PartialEq, Eq, Deserialize)]
#[serde(default)]
pub struct Post {
    pub num: u64,
    pub subnum: u64,
    pub thread_num: u64,
    pub op: bool,
    /// Shortname of the board the post belongs to.
    pub board: String,
    pub capcode: Capcode,
    pub comment: Option<String>,
    pub name: Option<String>,
    pub email: Option<String>,
    pub trip: Option<String>,
    pub title: Option<String>,
    pub poster_hash: Option<String>,
    pub poster_country: Option<String>,
    pub poster_ip: Option<String>,
    pub delpass: Option<String>,
}

impl Post {
    #[must_use]
    pub fn new(board: impl Into<String>, thread_num: u64, id: PostId) -> Self {
        Self {
            num: id.num,
            subnum: id.subnum,
            thread_num,
            op: id.num == thread_num && !id.is_ghost(),
            board: board.into(),
            ..Self::default()
        }
    }

    #[must_use]
    pub fn with_comment(mut self, comment: impl Into<String>) -> Self {
        self.comment = Some(comment.into());
        self
    }

    #[must_use]
    pub fn with_capcode(mut self, capcode: Capcode) -> Self {
        self.capcode = capcode;
        self
    }

    #[must_use]
    pub fn with_name(mut self, name: impl Into<String>) -> Self {
        self.name = Some(name.into());
        self
    }

    #[must_use]
    pub const fn id(&self) -> PostId {
        PostId::new(self.num, self.subnum)
    }

    #[must_use]
    pub const fn is_ghost(&self) -> bool {
        self.subnum != 0
    }

    /// Strip fields that must never reach a viewer.
    ///
    /// Runs the before-clean hook first, then drops the deletion password
    /// and, unless `reveal_ip` is set, the poster IP.
    pub fn clean(&mut self, hooks: &Hooks, reveal_ip: bool) {
        let ctx = CleanContext { reveal_ip };
        let post = std::mem::take(self);
        *self = hooks.before_clean.apply(&ctx, post);

        if !reveal_ip {
            self.poster_ip = None;
        }
        self.delpass = None;
    }
}

/// HTML-escaped display fields of a post.
///
/// Computed once, eagerly. `None` means the raw field was absent.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
pub struct ProcessedFields {
    pub title: Option<String>,
    pub name: Option<String>,
    pub email: Option<String>,
    pub trip: Option<String>,
    pub poster_hash: Option<String>,
    pub poster_country_name: Option<String>,
}

impl ProcessedFields {
    /// Compute display fields.
    ///
    /// A name containing `#` still carries its tripcode secret and is split
    /// here; otherwise the stored tripcode is used. Country codes are looked
    /// up upper-cased in `countries`.
    #[must_use]
    pub fn compute(post: &Post, salt: &SecureSalt, countries: &HashMap<String, String>) -> Self {
        let (name, trip) = match post.name.as_deref() {
            Some(raw) if raw.contains('#') => {
                let parsed = parse_name(raw, salt);
                let trip = if parsed.trip.is_empty() {
                    post.trip.clone()
                } else {
                    Some(parsed.trip)
                };
                (Some(parsed.name), trip)
            }
            _ => (post.name.clone(), post.trip.clone()),
        };

        let country_name = post
            .poster_country
            .as_deref()
            .and_then(|code| countries.get(&code.to_uppercase()));

        Self {
            title: post.title.as_deref().map(escape_html),
            name: name.as_deref().map(escape_html),
            email: post.email.as_deref().map(escape_html),
            trip: trip.as_deref().map(escape_html),
            poster_hash: post.poster_hash.as_deref().map(escape_html),
            poster_country_name: country_name.map(|name| escape_html(name)),
        }
    }
}

/// A post as handed to presentation: identifiers, rendered comment,
/// display fields and the posts quoting it.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct RenderedPost {
    pub num: u64,
    pub subnum: u64,
    pub thread_num: u64,
    pub op: bool,
    pub board: String,
    pub capcode: Capcode,
    pub comment_sanitized: String,
    pub comment_processed: String,
    #[serde(flatten)]
    pub fields: ProcessedFields,
    pub backlinks: Vec<Backlink>,
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;

    #[test]
    fn test_post_id_tokens() {
        assert_eq!(PostId::canonical(123).to_string(), "123");
        assert_eq!(PostId::new(123, 4).to_string(), "123,4");
        assert_eq!(PostId::new(123, 4).underscore(), "123_4");
        assert_eq!(PostId::canonical(9).underscore(), "9");
    }

    #[test]
    fn test_post_id_parse() {
        assert_eq!("123".parse::<PostId>(), Ok(PostId::canonical(123)));
        assert_eq!("123,4".parse::<PostId>(), Ok(PostId::new(123, 4)));
        assert_eq!("123_4".parse::<PostId>(), Ok(PostId::new(123, 4)));
        assert_eq!("007".parse::<PostId>(), Ok(PostId::canonical(7)));
        assert!("".parse::<PostId>().is_err());
        assert!("1,".parse::<PostId>().is_err());
        assert!("99999999999999999999999".parse::<PostId>().is_err());
    }

    #[test]
    fn test_capcode_serde() {
        let capcode: Capcode = serde_json::from_str(r#""A""#).unwrap();
        assert_eq!(capcode, Capcode::Admin);
        let capcode: Capcode = serde_json::from_str(r#""X""#).unwrap();
        assert_eq!(capcode, Capcode::None);
        assert_eq!(serde_json::to_string(&Capcode::GlobalMod).unwrap(), r#""G""#);
    }

    #[test]
    fn test_post_deserialize_defaults() {
        let post: Post =
            serde_json::from_str(r#"{"num": 5, "thread_num": 1, "board": "a", "comment": "hi"}"#)
                .unwrap();
        assert_eq!(post.id(), PostId::canonical(5));
        assert_eq!(post.capcode, Capcode::None);
        assert_eq!(post.comment.as_deref(), Some("hi"));
        assert!(post.name.is_none());
    }

    #[test]
    fn test_new_marks_op() {
        assert!(Post::new("a", 10, PostId::canonical(10)).op);
        assert!(!Post::new("a", 10, PostId::canonical(11)).op);
        assert!(!Post::new("a", 10, PostId::new(10, 1)).op);
    }

    #[test]
    fn test_clean_drops_private_fields() {
        let mut post = Post {
            poster_ip: Some("127.0.0.1".to_owned()),
            delpass: Some("secret".to_owned()),
            ..Post::default()
        };
        let mut revealed = post.clone();

        post.clean(&Hooks::new(), false);
        assert_eq!(post.poster_ip, None);
        assert_eq!(post.delpass, None);

        revealed.clean(&Hooks::new(), true);
        assert_eq!(revealed.poster_ip.as_deref(), Some("127.0.0.1"));
        assert_eq!(revealed.delpass, None);
    }

    #[test]
    fn test_clean_runs_hook_first() {
        let hooks = Hooks::new().on_before_clean(|ctx, mut post: Post| {
            if !ctx.reveal_ip {
                post.email = post.poster_ip.clone();
            }
            post
        });
        let mut post = Post {
            poster_ip: Some("10.0.0.1".to_owned()),
            ..Post::default()
        };

        post.clean(&hooks, false);
        assert_eq!(post.email.as_deref(), Some("10.0.0.1"));
        assert_eq!(post.poster_ip, None);
    }

    #[test]
    fn test_processed_fields_escape() {
        let post = Post {
            title: Some("<b>title</b>".to_owned()),
            email: Some("a&b".to_owned()),
            ..Post::default()
        };
        let fields = ProcessedFields::compute(&post, &SecureSalt::empty(), &HashMap::new());
        assert_eq!(fields.title.as_deref(), Some("&lt;b&gt;title&lt;/b&gt;"));
        assert_eq!(fields.email.as_deref(), Some("a&amp;b"));
        assert_eq!(fields.name, None);
        assert_eq!(fields.poster_country_name, None);
    }

    #[test]
    fn test_processed_fields_split_tripcode() {
        let post = Post {
            name: Some("moot#faggot".to_owned()),
            trip: Some("!stored".to_owned()),
            ..Post::default()
        };
        let fields = ProcessedFields::compute(&post, &SecureSalt::empty(), &HashMap::new());
        assert_eq!(fields.name.as_deref(), Some("moot"));
        assert_eq!(fields.trip.as_deref(), Some("!Ep8pui8Vw2"));
    }

    #[test]
    fn test_processed_fields_keep_stored_tripcode() {
        let post = Post {
            name: Some("Anonymous".to_owned()),
            trip: Some("!Ep8pui8Vw2".to_owned()),
            ..Post::default()
        };
        let fields = ProcessedFields::compute(&post, &SecureSalt::empty(), &HashMap::new());
        assert_eq!(fields.name.as_deref(), Some("Anonymous"));
        assert_eq!(fields.trip.as_deref(), Some("!Ep8pui8Vw2"));
    }

    #[test]
    fn test_processed_country_name() {
        let countries = HashMap::from([("US".to_owned(), "United States".to_owned())]);
        let post = Post {
            poster_country: Some("us".to_owned()),
            ..Post::default()
        };
        let fields = ProcessedFields::compute(&post, &SecureSalt::empty(), &countries);
        assert_eq!(fields.poster_country_name.as_deref(), Some("United States"));
    }
}
