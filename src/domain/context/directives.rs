//! Memory Directives
//!
//! 记忆守护者的 `MEMORY UPDATE:` 块按行携带标签：
//! - `EVENT: ...`
//! - `CHARACTER: 名字: 发展`
//! - `WORLD: 名称: 描述`
//! - `CONTINUITY ALERT: ...`
//!
//! 无法识别的行直接忽略。

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum MemoryDirective {
    /// 关键事件（用作章节摘要素材）
    Event(String),
    /// 角色发展
    Character { name: String, entry: String },
    /// 世界元素
    World { name: String, description: String },
    /// 连续性问题
    ContinuityAlert(String),
}

const EVENT_TAG: &str = "EVENT:";
const CHARACTER_TAG: &str = "CHARACTER:";
const WORLD_TAG: &str = "WORLD:";
const CONTINUITY_TAG: &str = "CONTINUITY ALERT:";

impl MemoryDirective {
    /// 解析一个记忆更新块
    pub fn parse_block(block: &str) -> Vec<MemoryDirective> {
        block.lines().filter_map(Self::parse_line).collect()
    }

    /// 解析单行
    pub fn parse_line(line: &str) -> Option<MemoryDirective> {
        let line = line.trim().trim_start_matches(['-', '*', ' ']).trim();

        if let Some(rest) = line.strip_prefix(CONTINUITY_TAG) {
            return non_empty(rest).map(MemoryDirective::ContinuityAlert);
        }
        if let Some(rest) = line.strip_prefix(EVENT_TAG) {
            return non_empty(rest).map(MemoryDirective::Event);
        }
        if let Some(rest) = line.strip_prefix(CHARACTER_TAG) {
            let (name, entry) = split_named(rest)?;
            return Some(MemoryDirective::Character { name, entry });
        }
        if let Some(rest) = line.strip_prefix(WORLD_TAG) {
            let (name, description) = split_named(rest)?;
            return Some(MemoryDirective::World { name, description });
        }
        None
    }
}

fn non_empty(text: &str) -> Option<String> {
    let text = text.trim();
    (!text.is_empty()).then(|| text.to_string())
}

/// 拆分 `名称: 内容`，两部分都不能为空
fn split_named(text: &str) -> Option<(String, String)> {
    let (name, body) = text.split_once(':')?;
    Some((non_empty(name)?, non_empty(body)?))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_block() {
        let block = "\
The chapter closes at dusk.
EVENT: Dane crosses the river
- CHARACTER: Dane: learns to swim
WORLD: River: cold and wide
CONTINUITY ALERT: the boat was burned in chapter 1
";
        let directives = MemoryDirective::parse_block(block);
        assert_eq!(
            directives,
            vec![
                MemoryDirective::Event("Dane crosses the river".to_string()),
                MemoryDirective::Character {
                    name: "Dane".to_string(),
                    entry: "learns to swim".to_string(),
                },
                MemoryDirective::World {
                    name: "River".to_string(),
                    description: "cold and wide".to_string(),
                },
                MemoryDirective::ContinuityAlert(
                    "the boat was burned in chapter 1".to_string()
                ),
            ]
        );
    }

    #[test]
    fn test_malformed_named_lines_are_ignored() {
        assert_eq!(MemoryDirective::parse_line("WORLD: River"), None);
        assert_eq!(MemoryDirective::parse_line("CHARACTER: : entry"), None);
        assert_eq!(MemoryDirective::parse_line("EVENT:   "), None);
    }

    #[test]
    fn test_description_may_contain_colons() {
        assert_eq!(
            MemoryDirective::parse_line("WORLD: Keep: gate: broken"),
            Some(MemoryDirective::World {
                name: "Keep".to_string(),
                description: "gate: broken".to_string(),
            })
        );
    }
}
