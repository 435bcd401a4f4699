//! Manuscript - 章节产物的排版与摘要
//!
//! 排版规则:
//! 1. 去掉 markdown 强调符 `*`
//! 2. 去掉正文开头已有的 `Chapter {n}` 标题行
//! 3. 加上统一的标题 `Chapter {n}: {title}`

use super::book::ChapterSpec;
use super::context::MemoryDirective;
use super::validator::MEMORY_UPDATE_MARKER;

/// 摘要最大字符数
pub const SUMMARY_MAX_CHARS: usize = 400;

/// 将会话最终文本排版为章节产物
pub fn compose(spec: &ChapterSpec, final_text: &str) -> String {
    let cleaned = final_text.replace('*', "");
    let marker = spec.number().header_marker();

    let mut lines = cleaned.lines().skip_while(|l| l.trim().is_empty()).peekable();
    if let Some(first) = lines.peek() {
        if is_heading_for(first.trim(), &marker) {
            lines.next();
        }
    }

    let body = lines.collect::<Vec<_>>().join("\n");
    format!("{}: {}\n\n{}\n", marker, spec.title(), body.trim())
}

/// "Chapter 3"、"Chapter 3: Title"、"Chapter 3 - Title" 视为标题行，"Chapter 30" 不算
fn is_heading_for(line: &str, marker: &str) -> bool {
    match line.strip_prefix(marker) {
        Some(rest) => !rest.starts_with(|c: char| c.is_ascii_digit()),
        None => false,
    }
}

/// 从章节产物提取摘要：跳过标题行和记忆更新行，取前几行正文
pub fn summarize(artifact: &str) -> String {
    let body = artifact
        .lines()
        .map(str::trim)
        .filter(|l| !l.is_empty() && !l.contains(MEMORY_UPDATE_MARKER))
        .skip(1)
        .collect::<Vec<_>>()
        .join(" ");
    truncate_chars(&body, SUMMARY_MAX_CHARS)
}

/// 优先使用记忆守护者给出的关键事件作为摘要，没有时回退到正文摘录
pub fn summary_from(directives: &[MemoryDirective], artifact: &str) -> String {
    let events: Vec<&str> = directives
        .iter()
        .filter_map(|d| match d {
            MemoryDirective::Event(event) => Some(event.as_str()),
            _ => None,
        })
        .collect();

    if events.is_empty() {
        summarize(artifact)
    } else {
        truncate_chars(&events.join("; "), SUMMARY_MAX_CHARS)
    }
}

fn truncate_chars(text: &str, max_chars: usize) -> String {
    match text.char_indices().nth(max_chars) {
        Some((cut, _)) => format!("{}...", text[..cut].trim_end()),
        None => text.to_string(),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::validator::is_valid;

    fn spec(n: u32) -> ChapterSpec {
        ChapterSpec::new(n, "The Crossing", "Dane crosses the river").unwrap()
    }

    #[test]
    fn test_compose_adds_heading_and_strips_markdown() {
        let text = compose(&spec(2), "**The water** was cold.\nDane swam.");
        assert_eq!(text, "Chapter 2: The Crossing\n\nThe water was cold.\nDane swam.\n");
        assert!(is_valid(&text, spec(2).number()));
    }

    #[test]
    fn test_compose_replaces_existing_heading() {
        let text = compose(&spec(2), "\nChapter 2: Crossing\nThe water was cold.\nDane swam.");
        assert_eq!(text.matches("Chapter 2").count(), 1);
        assert!(text.starts_with("Chapter 2: The Crossing\n"));
    }

    #[test]
    fn test_compose_keeps_line_for_other_chapter_number() {
        let text = compose(&spec(3), "Chapter 30 was never written.\nMore.");
        assert!(text.contains("Chapter 30 was never written."));
    }

    #[test]
    fn test_summarize_skips_heading_and_memory_lines() {
        let artifact = "Chapter 1: Start\n\nMEMORY UPDATE: x\nDane wakes.\nThe sky is red.\n";
        assert_eq!(summarize(artifact), "Dane wakes. The sky is red.");
    }

    #[test]
    fn test_summarize_truncates_on_char_boundary() {
        let long = format!("Chapter 1\n{}", "é".repeat(SUMMARY_MAX_CHARS + 10));
        let summary = summarize(&long);
        assert!(summary.ends_with("..."));
        assert_eq!(summary.chars().count(), SUMMARY_MAX_CHARS + 3);
    }

    #[test]
    fn test_summary_prefers_events() {
        let directives = vec![
            MemoryDirective::Event("storm hits".to_string()),
            MemoryDirective::World {
                name: "Bay".to_string(),
                description: "flooded".to_string(),
            },
            MemoryDirective::Event("boat lost".to_string()),
        ];
        assert_eq!(summary_from(&directives, "Chapter 1\nignored"), "storm hits; boat lost");
        assert_eq!(summary_from(&[], "Chapter 1\nused"), "used");
    }
}
