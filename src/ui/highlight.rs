use crate::models::ThemeMode;
use colored::*;
use regex::Regex;
use syntect::easy::HighlightLines;
use syntect::highlighting::{Style, ThemeSet};
use syntect::parsing::SyntaxSet;
use syntect::util::{as_24_bit_terminal_escaped, LinesWithEndings};

/// Renders the small markdown subset bot replies use: headings, bullets,
/// `**bold**`, `` `code` `` and fenced code blocks.
pub struct MarkdownRenderer {
    syntax_set: SyntaxSet,
    theme_set: ThemeSet,
    bold: Regex,
    inline_code: Regex,
    bullet: Regex,
}

impl MarkdownRenderer {
    pub fn new() -> Self {
        Self {
            syntax_set: SyntaxSet::load_defaults_newlines(),
            theme_set: ThemeSet::load_defaults(),
            bold: Regex::new(r"\*\*([^*]+)\*\*").expect("valid bold pattern"),
            inline_code: Regex::new(r"`([^`]+)`").expect("valid inline code pattern"),
            bullet: Regex::new(r"^(\s*)[-*+]\s+(.*)$").expect("valid bullet pattern"),
        }
    }

    fn highlight_code(&self, code: &str, lang: Option<&str>, mode: ThemeMode) -> String {
        let theme_name = match mode {
            ThemeMode::Light => "InspiredGitHub",
            ThemeMode::Dark => "Solarized (dark)",
        };
        let theme = match self.theme_set.themes.get(theme_name) {
            Some(theme) => theme,
            None => return code.to_string(),
        };

        let syntax = lang
            .and_then(|lang| {
                self.syntax_set
                    .find_syntax_by_token(lang)
                    .or_else(|| self.syntax_set.find_syntax_by_extension(lang))
            })
            .unwrap_or_else(|| self.syntax_set.find_syntax_plain_text());

        let mut highlighter = HighlightLines::new(syntax, theme);
        let mut output = String::new();

        for line in LinesWithEndings::from(code) {
            match highlighter.highlight_line(line, &self.syntax_set) {
                Ok(ranges) => {
                    let ranges: Vec<(Style, &str)> = ranges;
                    output.push_str(&as_24_bit_terminal_escaped(&ranges[..], false));
                }
                Err(_) => output.push_str(line),
            }
        }
        output.push_str("\x1b[0m");

        output
    }

    fn render_inline(&self, line: &str) -> String {
        let line = self
            .inline_code
            .replace_all(line, |caps: &regex::Captures| caps[1].cyan().to_string());
        self.bold
            .replace_all(&line, |caps: &regex::Captures| caps[1].bold().to_string())
            .into_owned()
    }

    pub fn render(&self, content: &str, mode: ThemeMode) -> String {
        let mut output = String::new();
        let mut code_lang: Option<String> = None;
        let mut code = String::new();
        let mut in_code_block = false;

        for line in content.lines() {
            let trimmed = line.trim_start();

            if let Some(fence) = trimmed.strip_prefix("```") {
                if in_code_block {
                    output.push_str(&self.highlight_code(&code, code_lang.as_deref(), mode));
                    output.push_str(&format!(
                        "{}\n",
                        "└──────────────────────────────────────────────".dimmed()
                    ));
                    code.clear();
                    code_lang = None;
                    in_code_block = false;
                } else {
                    let lang = fence.trim();
                    code_lang = (!lang.is_empty()).then(|| lang.to_string());
                    output.push_str(&format!(
                        "{}[{}]{}\n",
                        "┌─".dimmed(),
                        code_lang.as_deref().unwrap_or("code").cyan(),
                        "─────────────────────────────────────".dimmed()
                    ));
                    in_code_block = true;
                }
                continue;
            }

            if in_code_block {
                code.push_str(line);
                code.push('\n');
                continue;
            }

            if trimmed.starts_with('#') {
                let heading = trimmed.trim_start_matches('#').trim();
                output.push_str(&self.render_inline(heading).bold().underline().to_string());
            } else if let Some(caps) = self.bullet.captures(line) {
                output.push_str(&format!("{}  • {}", &caps[1], self.render_inline(&caps[2])));
            } else {
                output.push_str(&self.render_inline(line));
            }
            output.push('\n');
        }

        // Unterminated fence: still show what was collected.
        if in_code_block {
            output.push_str(&self.highlight_code(&code, code_lang.as_deref(), mode));
            output.push_str(&format!(
                "{}\n",
                "└──────────────────────────────────────────────".dimmed()
            ));
        }

        output
    }
}

impl Default for MarkdownRenderer {
    fn default() -> Self {
        Self::new()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn plain(renderer: &MarkdownRenderer, content: &str) -> String {
        colored::control::set_override(false);
        renderer.render(content, ThemeMode::Light)
    }

    #[test]
    fn test_bold_and_bullets() {
        let renderer = MarkdownRenderer::new();
        let out = plain(&renderer, "Your **bill** is ready:\n- Due: 5th\n* Amount: 1,200");
        assert_eq!(out, "Your bill is ready:\n  • Due: 5th\n  • Amount: 1,200\n");
    }

    #[test]
    fn test_heading_marks_removed() {
        let renderer = MarkdownRenderer::new();
        let out = plain(&renderer, "## Summary");
        assert_eq!(out, "Summary\n");
    }

    #[test]
    fn test_code_block_framed() {
        let renderer = MarkdownRenderer::new();
        let out = plain(&renderer, "```json\n{\"limit\": 5}\n```");
        assert!(out.starts_with("┌─[json]"));
        assert!(out.contains("limit"));
        assert!(out.trim_end().ends_with('─'));
    }

    #[test]
    fn test_unterminated_code_block_is_flushed() {
        let renderer = MarkdownRenderer::new();
        let out = plain(&renderer, "```\nlet x = 1;");
        assert!(out.contains("let x = 1;"));
        assert!(out.contains('└'));
    }
}
