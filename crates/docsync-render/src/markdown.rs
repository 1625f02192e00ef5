//! Markdown renderer
//!
//! Converts markdown into the XHTML based storage format understood by the
//! remote store. Supports headings, paragraphs, bullet and ordered lists,
//! block quotes, horizontal rules, fenced code blocks, inline code, emphasis,
//! links and images. Local images become page attachments.

use std::fs;
use std::path::{Path, PathBuf};
use std::sync::LazyLock;

use regex::Regex;
use tracing::{debug, warn};

use docsync_tree::Content;

use crate::renderer::{Attachment, AttachmentSource, ContentRenderer, RenderedContent};
use crate::{Error, RenderParams, Result};

static HEADING: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"^(#{1,6})\s+(.+?)(?:\s+#+)?\s*$").unwrap());
static FENCE: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"^\s*(`{3,}|~{3,})\s*(.*?)\s*$").unwrap());
static RULE: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"^\s*(?:(?:-\s*){3,}|(?:\*\s*){3,}|(?:_\s*){3,})$").unwrap()
});
static BULLET: LazyLock<Regex> = LazyLock::new(|| Regex::new(r"^\s*[-*+]\s+(.*)$").unwrap());
static ORDERED: LazyLock<Regex> = LazyLock::new(|| Regex::new(r"^\s*\d+[.)]\s+(.*)$").unwrap());
static QUOTE: LazyLock<Regex> = LazyLock::new(|| Regex::new(r"^\s*>\s?(.*)$").unwrap());

static CODE_SPAN: LazyLock<Regex> = LazyLock::new(|| Regex::new(r"`([^`]+)`").unwrap());
static LINK_OR_IMAGE: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"(!?)\[([^\]]*)\]\(\s*([^)\s]+)[^)]*\)").unwrap());
static STRONG: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"\*\*([^*]+)\*\*|__([^_]+)__").unwrap());
static EMPHASIS: LazyLock<Regex> = LazyLock::new(|| Regex::new(r"\*([^*\s][^*]*)\*").unwrap());

/// Renders markdown content files.
#[derive(Debug, Default)]
pub struct MarkdownRenderer;

impl MarkdownRenderer {
    /// Create a new MarkdownRenderer
    pub fn new() -> Self {
        Self
    }

    /// Convert markdown text to the storage format.
    ///
    /// `source_path` locates the markdown file; local images are resolved
    /// relative to its directory. Returns the body and the attachments it
    /// references.
    pub fn to_storage(&self, markdown: &str, source_path: &Path) -> Result<(String, Vec<Attachment>)> {
        let mut ctx = InlineContext::new(source_path);
        let mut blocks = BlockWriter::default();
        let mut lines = markdown.lines().enumerate();

        while let Some((idx, line)) = lines.next() {
            if let Some(caps) = FENCE.captures(line)
                && !(caps[1].starts_with('`') && caps[2].contains('`'))
            {
                blocks.flush(&mut ctx)?;
                let marker = caps[1].to_string();
                let language = fence_language(&caps[2]).to_string();
                let mut code = Vec::new();
                let mut closed = false;
                for (_, inner) in lines.by_ref() {
                    if closes_fence(inner, &marker) {
                        closed = true;
                        break;
                    }
                    code.push(inner);
                }
                if !closed {
                    return Err(Error::Malformed {
                        path: source_path.to_path_buf(),
                        line: idx + 1,
                        message: "unterminated code fence".to_string(),
                    });
                }
                blocks.push_block(code_macro(&language, &code.join("\n")));
                continue;
            }

            if line.trim().is_empty() {
                blocks.flush(&mut ctx)?;
            } else if let Some(caps) = HEADING.captures(line) {
                blocks.flush(&mut ctx)?;
                let level = caps[1].len();
                let text = ctx.inline(&caps[2])?;
                blocks.push_block(format!("<h{level}>{text}</h{level}>"));
            } else if RULE.is_match(line) {
                blocks.flush(&mut ctx)?;
                blocks.push_block("<hr />".to_string());
            } else if let Some(caps) = QUOTE.captures(line) {
                blocks.flush_paragraph(&mut ctx)?;
                blocks.flush_list(&mut ctx)?;
                blocks.quote.push(caps[1].to_string());
            } else if let Some(caps) = BULLET.captures(line) {
                blocks.push_item(ListKind::Bullet, &caps[1], &mut ctx)?;
            } else if let Some(caps) = ORDERED.captures(line) {
                blocks.push_item(ListKind::Ordered, &caps[1], &mut ctx)?;
            } else if blocks.list.is_some() && line.starts_with(char::is_whitespace) {
                blocks.continue_item(line.trim());
            } else {
                blocks.flush_list(&mut ctx)?;
                blocks.flush_quote(&mut ctx)?;
                blocks.paragraph.push(line.trim().to_string());
            }
        }
        blocks.flush(&mut ctx)?;

        Ok((blocks.finish(), ctx.attachments))
    }
}

impl ContentRenderer for MarkdownRenderer {
    fn render(&self, content: &Content, params: &RenderParams) -> Result<RenderedContent> {
        let source = fs::read_to_string(&content.path).map_err(|e| Error::Read {
            path: content.path.clone(),
            source: e,
        })?;
        let source = params.resolve_base_url(&source);
        let (body, attachments) = self.to_storage(&source, &content.path)?;

        debug!(
            "Rendered {} ({} bytes, {} attachments)",
            content.url,
            body.len(),
            attachments.len()
        );

        Ok(RenderedContent {
            title: content.title.clone(),
            body,
            attachments,
        })
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum ListKind {
    Bullet,
    Ordered,
}

impl ListKind {
    fn tag(self) -> &'static str {
        match self {
            ListKind::Bullet => "ul",
            ListKind::Ordered => "ol",
        }
    }
}

/// Accumulates open blocks and the rendered output
#[derive(Default)]
struct BlockWriter {
    out: Vec<String>,
    paragraph: Vec<String>,
    list: Option<(ListKind, Vec<String>)>,
    quote: Vec<String>,
}

impl BlockWriter {
    fn push_block(&mut self, block: String) {
        self.out.push(block);
    }

    fn push_item(&mut self, kind: ListKind, text: &str, ctx: &mut InlineContext) -> Result<()> {
        self.flush_paragraph(ctx)?;
        self.flush_quote(ctx)?;
        if matches!(&self.list, Some((open, _)) if *open != kind) {
            self.flush_list(ctx)?;
        }
        self.list
            .get_or_insert_with(|| (kind, Vec::new()))
            .1
            .push(text.trim().to_string());
        Ok(())
    }

    fn continue_item(&mut self, text: &str) {
        if let Some((_, items)) = &mut self.list
            && let Some(last) = items.last_mut()
        {
            last.push(' ');
            last.push_str(text);
        }
    }

    fn flush_paragraph(&mut self, ctx: &mut InlineContext) -> Result<()> {
        if self.paragraph.is_empty() {
            return Ok(());
        }
        let text = ctx.inline(&self.paragraph.join(" "))?;
        self.paragraph.clear();
        self.out.push(format!("<p>{text}</p>"));
        Ok(())
    }

    fn flush_list(&mut self, ctx: &mut InlineContext) -> Result<()> {
        let Some((kind, items)) = self.list.take() else {
            return Ok(());
        };
        let mut html = format!("<{}>", kind.tag());
        for item in items {
            html.push_str(&format!("<li>{}</li>", ctx.inline(&item)?));
        }
        html.push_str(&format!("</{}>", kind.tag()));
        self.out.push(html);
        Ok(())
    }

    fn flush_quote(&mut self, ctx: &mut InlineContext) -> Result<()> {
        if self.quote.is_empty() {
            return Ok(());
        }
        let text = ctx.inline(self.quote.join(" ").trim())?;
        self.quote.clear();
        self.out.push(format!("<blockquote><p>{text}</p></blockquote>"));
        Ok(())
    }

    fn flush(&mut self, ctx: &mut InlineContext) -> Result<()> {
        self.flush_paragraph(ctx)?;
        self.flush_list(ctx)?;
        self.flush_quote(ctx)
    }

    fn finish(self) -> String {
        self.out.join("\n")
    }
}

/// Inline rendering state for one source file
struct InlineContext {
    source: PathBuf,
    base_dir: PathBuf,
    attachments: Vec<Attachment>,
}

impl InlineContext {
    fn new(source: &Path) -> Self {
        Self {
            source: source.to_path_buf(),
            base_dir: source.parent().map(Path::to_path_buf).unwrap_or_default(),
            attachments: Vec::new(),
        }
    }

    fn inline(&mut self, text: &str) -> Result<String> {
        let mut out = String::new();
        let mut last = 0;
        for caps in CODE_SPAN.captures_iter(text) {
            let Some(span) = caps.get(0) else { continue };
            out.push_str(&self.links_and_images(&text[last..span.start()])?);
            out.push_str(&format!("<code>{}</code>", escape(&caps[1])));
            last = span.end();
        }
        out.push_str(&self.links_and_images(&text[last..])?);
        Ok(out)
    }

    fn links_and_images(&mut self, text: &str) -> Result<String> {
        let mut out = String::new();
        let mut last = 0;
        for caps in LINK_OR_IMAGE.captures_iter(text) {
            let Some(whole) = caps.get(0) else { continue };
            out.push_str(&emphasis(&escape(&text[last..whole.start()])));
            let label = &caps[2];
            let target = &caps[3];
            if caps[1].is_empty() {
                out.push_str(&format!(
                    "<a href=\"{}\">{}</a>",
                    escape(target),
                    emphasis(&escape(label))
                ));
            } else {
                out.push_str(&self.image(label, target)?);
            }
            last = whole.end();
        }
        out.push_str(&emphasis(&escape(&text[last..])));
        Ok(out)
    }

    fn image(&mut self, alt: &str, target: &str) -> Result<String> {
        let alt_attr = if alt.is_empty() {
            String::new()
        } else {
            format!(" ac:alt=\"{}\"", escape(alt))
        };

        if is_remote(target) {
            return Ok(format!(
                "<ac:image{}><ri:url ri:value=\"{}\" /></ac:image>",
                alt_attr,
                escape(target)
            ));
        }

        let local = target.split(['?', '#']).next().unwrap_or(target);
        let path = self.base_dir.join(local);
        if !path.is_file() {
            return Err(Error::MissingImage {
                path: self.source.clone(),
                target: target.to_string(),
            });
        }
        let filename = path
            .file_name()
            .map(|n| n.to_string_lossy().to_string())
            .unwrap_or_else(|| local.to_string());
        self.attach(&filename, path);

        Ok(format!(
            "<ac:image{}><ri:attachment ri:filename=\"{}\" /></ac:image>",
            alt_attr,
            escape(&filename)
        ))
    }

    fn attach(&mut self, filename: &str, path: PathBuf) {
        match self.attachments.iter().find(|a| a.filename == filename) {
            Some(existing) => {
                if existing.source != AttachmentSource::File(path.clone()) {
                    warn!(
                        "{}: attachment name {} already used by another file, keeping the first",
                        self.source.display(),
                        filename
                    );
                }
            }
            None => self.attachments.push(Attachment::file(filename, path)),
        }
    }
}

fn is_remote(target: &str) -> bool {
    target.starts_with("http://")
        || target.starts_with("https://")
        || target.starts_with("//")
        || target.starts_with("data:")
}

fn escape(text: &str) -> String {
    text.replace('&', "&amp;")
        .replace('<', "&lt;")
        .replace('>', "&gt;")
        .replace('"', "&quot;")
}

fn emphasis(text: &str) -> String {
    let strong = STRONG.replace_all(text, |caps: &regex::Captures<'_>| {
        if let Some(inner) = caps.get(1) {
            return format!("<strong>{}</strong>", inner.as_str());
        }
        let Some(whole) = caps.get(0) else {
            return String::new();
        };
        // underscores inside a word are literal
        let before = text[..whole.start()].chars().next_back();
        let after = text[whole.end()..].chars().next();
        if before.is_some_and(is_word_char) || after.is_some_and(is_word_char) {
            return whole.as_str().to_string();
        }
        let inner = caps.get(2).map_or("", |m| m.as_str());
        format!("<strong>{inner}</strong>")
    });
    EMPHASIS.replace_all(&strong, "<em>$1</em>").into_owned()
}

/// Language of a fence info string: its first word, e.g. `rust` in `rust,ignore`.
fn fence_language(info: &str) -> &str {
    info.split(|c: char| c.is_whitespace() || c == ',')
        .next()
        .unwrap_or_default()
}

/// A closing fence uses the opener's character, at least as many times, and nothing else.
fn closes_fence(line: &str, marker: &str) -> bool {
    let trimmed = line.trim();
    let Some(fence_char) = marker.chars().next() else {
        return false;
    };
    trimmed.len() >= marker.len() && trimmed.chars().all(|c| c == fence_char)
}

fn is_word_char(c: char) -> bool {
    c.is_alphanumeric() || c == '_'
}

fn code_macro(language: &str, code: &str) -> String {
    let language = if language.is_empty() {
        String::new()
    } else {
        format!("<ac:parameter ac:name=\"language\">{}</ac:parameter>", escape(language))
    };
    format!(
        "<ac:structured-macro ac:name=\"code\">{}<ac:plain-text-body><![CDATA[{}]]></ac:plain-text-body></ac:structured-macro>",
        language,
        code.replace("]]>", "]]]]><![CDATA[>")
    )
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;
    use rstest::rstest;

    fn render(markdown: &str) -> String {
        MarkdownRenderer::new()
            .to_storage(markdown, Path::new("/docs/page.md"))
            .unwrap()
            .0
    }

    #[rstest]
    #[case("# Title", "<h1>Title</h1>")]
    #[case("### Deep ###", "<h3>Deep</h3>")]
    #[case("## C#", "<h2>C#</h2>")]
    #[case("---", "<hr />")]
    #[case("plain text", "<p>plain text</p>")]
    #[case("a < b & c", "<p>a &lt; b &amp; c</p>")]
    #[case("**bold** and *em*", "<p><strong>bold</strong> and <em>em</em></p>")]
    #[case("__bold__", "<p><strong>bold</strong></p>")]
    #[case("snake__case__x", "<p>snake__case__x</p>")]
    #[case("call foo__bar__ now", "<p>call foo__bar__ now</p>")]
    #[case("a __b__ c", "<p>a <strong>b</strong> c</p>")]
    #[case("use `a*b*c` here", "<p>use <code>a*b*c</code> here</p>")]
    #[case("> quoted", "<blockquote><p>quoted</p></blockquote>")]
    fn test_single_blocks(#[case] markdown: &str, #[case] expected: &str) {
        assert_eq!(render(markdown), expected);
    }

    #[test]
    fn test_paragraph_lines_are_joined() {
        assert_eq!(render("one\ntwo\n\nthree"), "<p>one two</p>\n<p>three</p>");
    }

    #[test]
    fn test_lists() {
        let body = render("- a\n- b\n  continued\n\n1. x\n2. y");
        assert_eq!(
            body,
            "<ul><li>a</li><li>b continued</li></ul>\n<ol><li>x</li><li>y</li></ol>"
        );
    }

    #[test]
    fn test_list_kind_switch_closes_list() {
        assert_eq!(render("- a\n1. b"), "<ul><li>a</li></ul>\n<ol><li>b</li></ol>");
    }

    #[test]
    fn test_link() {
        assert_eq!(
            render("see [the **docs**](https://example.com/?a=1&b=2)"),
            "<p>see <a href=\"https://example.com/?a=1&amp;b=2\">the <strong>docs</strong></a></p>"
        );
    }

    #[test]
    fn test_remote_image() {
        assert_eq!(
            render("![logo](https://example.com/logo.png)"),
            "<p><ac:image ac:alt=\"logo\"><ri:url ri:value=\"https://example.com/logo.png\" /></ac:image></p>"
        );
    }

    #[test]
    fn test_code_fence_with_language() {
        let body = render("```rust\nfn main() {}\n```");
        assert_eq!(
            body,
            "<ac:structured-macro ac:name=\"code\"><ac:parameter ac:name=\"language\">rust</ac:parameter><ac:plain-text-body><![CDATA[fn main() {}]]></ac:plain-text-body></ac:structured-macro>"
        );
    }

    fn code_block(language: &str, code: &str) -> String {
        let language = if language.is_empty() {
            String::new()
        } else {
            format!("<ac:parameter ac:name=\"language\">{language}</ac:parameter>")
        };
        format!(
            "<ac:structured-macro ac:name=\"code\">{language}<ac:plain-text-body><![CDATA[{code}]]></ac:plain-text-body></ac:structured-macro>"
        )
    }

    #[rstest]
    #[case("```rust,ignore\nfn main() {}\n```", "rust", "fn main() {}")]
    #[case("```js title=\"a.js\"\nlet x;\n```", "js", "let x;")]
    #[case("``` python \nx = 1\n```", "python", "x = 1")]
    #[case("```\nplain\n`````", "", "plain")]
    #[case("````md\n```\nnested\n```\n````", "md", "```\nnested\n```")]
    #[case("~~~sh\n```\n~~~~", "sh", "```")]
    fn test_code_fence_variants(#[case] markdown: &str, #[case] language: &str, #[case] code: &str) {
        assert_eq!(render(markdown), code_block(language, code));
    }

    #[test]
    fn test_code_fence_followed_by_text() {
        assert_eq!(
            render("```rust,no_run\nlet a = 1;\n```\n\nafter"),
            format!("{}\n<p>after</p>", code_block("rust", "let a = 1;"))
        );
    }

    #[test]
    fn test_backticks_in_info_string_are_not_a_fence() {
        let body = render("```a` b```");
        assert!(body.starts_with("<p>"), "got: {body}");
        assert!(!body.contains("structured-macro"));
    }

    #[test]
    fn test_code_fence_keeps_markup_verbatim() {
        let body = render("~~~\n# not a heading\n<b>\n~~~");
        assert!(body.contains("<![CDATA[# not a heading\n<b>]]>"));
        assert!(!body.contains("<h1>"));
    }

    #[test]
    fn test_unterminated_fence_is_malformed() {
        let err = MarkdownRenderer::new()
            .to_storage("intro\n\n```\ncode", Path::new("/docs/page.md"))
            .unwrap_err();

        match err {
            Error::Malformed { line, .. } => assert_eq!(line, 3),
            other => panic!("expected Malformed, got {other:?}"),
        }
    }

    #[test]
    fn test_missing_local_image() {
        let err = MarkdownRenderer::new()
            .to_storage("![x](img/missing.png)", Path::new("/nowhere/page.md"))
            .unwrap_err();
        assert!(matches!(err, Error::MissingImage { ref target, .. } if target == "img/missing.png"));
    }

    #[test]
    fn test_cdata_terminator_is_split() {
        let body = render("```\na ]]> b\n```");
        assert!(body.contains("a ]]]]><![CDATA[> b"));
    }
}
