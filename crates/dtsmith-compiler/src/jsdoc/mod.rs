//! Documentation-comment grammar.
//!
//! Turns raw block-comment text into a free-text description plus a list of
//! structured tags, each optionally carrying a parsed type expression.
//!
//! Malformed type text inside `{...}` degrades to an untyped tag rather than
//! failing: an unreadable annotation is the same as a missing one, and the
//! resolver attaches a diagnostic either way. Productions the rest of the
//! pipeline refuses to expand are rejected later, by the adapter, where the
//! offending production can be named.

mod lexer;
mod parser;


pub use parser::parse_type_expr;

/// A documentation type expression, as written between braces in a tag.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum TypeExpr {
    /// `*`
    All,
    /// `string`, `external:String`, `foo.Bar`
    Name(String),
    /// `(a|b|c)`
    Union(Vec<TypeExpr>),
    /// `Array.<string>` or `Array<string, number>`
    Application { name: String, args: Vec<TypeExpr> },
    /// `?T`
    Nullable(Box<TypeExpr>),
    /// `!T`
    NonNullable(Box<TypeExpr>),
    /// `T=`
    Optional(Box<TypeExpr>),
    /// `...T`
    Rest(Box<TypeExpr>),
    /// `function(a, b): r`
    Function {
        params: Vec<TypeExpr>,
        result: Option<Box<TypeExpr>>,
    },
}

impl TypeExpr {
    /// Production tag, used verbatim in `UnsupportedTypeGrammar` errors.
    pub fn production(&self) -> &'static str {
        match self {
            TypeExpr::All => "AllLiteral",
            TypeExpr::Name(_) => "NameExpression",
            TypeExpr::Union(_) => "UnionType",
            TypeExpr::Application { .. } => "TypeApplication",
            TypeExpr::Nullable(_) => "NullableType",
            TypeExpr::NonNullable(_) => "NonNullableType",
            TypeExpr::Optional(_) => "OptionalType",
            TypeExpr::Rest(_) => "RestType",
            TypeExpr::Function { .. } => "FunctionType",
        }
    }
}

/// One `@tag` in a documentation comment.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Tag {
    pub title: String,
    pub name: Option<String>,
    pub description: String,
    pub type_expr: Option<TypeExpr>,
}

/// A parsed documentation comment: free text plus tags, in source order.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct DocComment {
    pub description: String,
    pub tags: Vec<Tag>,
}

impl DocComment {
    /// First `@param` tag whose name matches `param`.
    pub fn param(&self, param: &str) -> Option<&Tag> {
        self.tags
            .iter()
            .filter(|t| matches!(t.title.as_str(), "param" | "arg" | "argument"))
            .find(|t| t.name.as_deref() == Some(param))
    }

    /// The `@return` / `@returns` tag, if any.
    pub fn returns(&self) -> Option<&Tag> {
        self.tags
            .iter()
            .find(|t| matches!(t.title.as_str(), "return" | "returns"))
    }

    /// All `@typedef` tags.
    pub fn typedefs(&self) -> impl Iterator<Item = &Tag> {
        self.tags.iter().filter(|t| t.title == "typedef")
    }
}

/// Whether a tag title is followed by a bound name (`@param {t} name ...`)
/// as opposed to going straight to description (`@return {t} ...`).
fn tag_takes_name(title: &str) -> bool {
    matches!(
        title,
        "param" | "arg" | "argument" | "typedef" | "property" | "prop"
    )
}

/// Parse one raw block comment (`/** ... */`, markers included).
pub fn parse_comment(raw: &str) -> DocComment {
    let body = strip_markers(raw);

    let mut description_lines: Vec<&str> = Vec::new();
    let mut tag_chunks: Vec<Vec<&str>> = Vec::new();

    for line in body.lines() {
        if line.trim_start().starts_with('@') {
            tag_chunks.push(vec![line.trim()]);
        } else if let Some(current) = tag_chunks.last_mut() {
            current.push(line.trim());
        } else {
            description_lines.push(line);
        }
    }

    let description = description_lines.join("\n").trim().to_string();
    let tags = tag_chunks
        .iter()
        .map(|chunk| parse_tag(&chunk.join(" ")))
        .collect();

    DocComment { description, tags }
}

/// Strip `/** ... */` fences and the decorative leading `*` per line.
fn strip_markers(raw: &str) -> String {
    let inner = raw
        .trim()
        .trim_start_matches("/**")
        .trim_start_matches("/*")
        .trim_end_matches("*/");

    inner
        .lines()
        .map(|line| {
            let line = line.trim_start();
            line.strip_prefix('*').map(str::trim_start).unwrap_or(line)
        })
        .collect::<Vec<_>>()
        .join("\n")
}

/// Parse one tag chunk: `@title {type}? name? description...`.
fn parse_tag(chunk: &str) -> Tag {
    let rest = chunk.trim_start_matches('@');
    let (title, mut rest) = split_word(rest);
    let title = title.to_string();

    let mut type_expr = None;
    rest = rest.trim_start();
    if rest.starts_with('{') {
        let (braced, after) = take_braced(rest);
        type_expr = parse_type_expr(braced);
        rest = after.trim_start();
    }

    let mut name = None;
    if tag_takes_name(&title) {
        let (word, after) = split_word(rest);
        if !word.is_empty() {
            name = Some(word.to_string());
        }
        rest = after.trim_start();
    }

    Tag {
        title,
        name,
        description: rest.trim().to_string(),
        type_expr,
    }
}

/// Split off the first whitespace-delimited word.
fn split_word(s: &str) -> (&str, &str) {
    let s = s.trim_start();
    match s.find(char::is_whitespace) {
        Some(i) => (&s[..i], &s[i..]),
        None => (s, ""),
    }
}

/// Take a balanced `{...}` group, returning its interior and the remainder.
fn take_braced(s: &str) -> (&str, &str) {
    debug_assert!(s.starts_with('{'));
    let mut depth = 0usize;
    for (i, c) in s.char_indices() {
        match c {
            '{' => depth += 1,
            '}' => {
                depth -= 1;
                if depth == 0 {
                    return (&s[1..i], &s[i + 1..]);
                }
            }
            _ => {}
        }
    }
    // Unterminated brace group: treat the rest of the chunk as type text.
    (&s[1..], "")
}
