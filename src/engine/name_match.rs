// ==========================================
// DFS 阵容优化器 - 姓名匹配工具
// ==========================================
// 职责: 手工选择名单与球员姓名的模糊匹配纯逻辑
// 红线: 无状态、无副作用; 阈值与回退顺序固定,
//       不在调用方散落重复启发式
// ==========================================
// 回退顺序: 精确 → 子串 → 姓氏 → 编辑距离比率
// ==========================================

use strsim::normalized_levenshtein;

/// 编辑距离比率的接受阈值（归一化相似度）
pub const SIMILARITY_THRESHOLD: f64 = 0.70;

/// 子串匹配要求的最短归一化长度, 避免 "al" 命中半个联盟
const MIN_SUBSTRING_LEN: usize = 3;

// ==========================================
// NameMatcher - 纯函数工具类
// ==========================================
pub struct NameMatcher;

impl NameMatcher {
    /// 归一化姓名
    ///
    /// # 规则
    /// - 全部转小写
    /// - 点号/撇号直接删除 ("J.D." → "jd", "O'Neill" → "oneill")
    /// - 其余非字母数字字符视为空白
    /// - 连续空白折叠为单个空格
    pub fn normalize(name: &str) -> String {
        let mut out = String::with_capacity(name.len());
        let mut pending_space = false;
        for ch in name.chars() {
            if ch.is_alphanumeric() {
                if pending_space && !out.is_empty() {
                    out.push(' ');
                }
                pending_space = false;
                for low in ch.to_lowercase() {
                    out.push(low);
                }
            } else if matches!(ch, '.' | '\'' | '’') {
                // 直接删除, 不产生分词边界
            } else {
                pending_space = true;
            }
        }
        out
    }

    /// 切分手工选择名单文本
    ///
    /// 分隔符宽容: 逗号/分号/竖线/换行均可混用
    pub fn split_tokens(text: &str) -> Vec<String> {
        text.split(|c| matches!(c, ',' | ';' | '|' | '\n' | '\r'))
            .map(|t| t.trim())
            .filter(|t| !t.is_empty())
            .map(|t| t.to_string())
            .collect()
    }

    /// 在姓名列表中查找 token 的最佳匹配
    ///
    /// # 回退顺序
    /// 1. 精确匹配（归一化后相等）
    /// 2. 子串匹配（任一方向, 归一化长度 >= 3）
    /// 3. 姓氏匹配（末词相等, 仅当唯一命中时接受）
    /// 4. 编辑距离比率（最佳者 >= SIMILARITY_THRESHOLD）
    ///
    /// # 返回
    /// 命中姓名的下标; 未命中返回 None（由调用方记告警）
    pub fn find_best(token: &str, names: &[String]) -> Option<usize> {
        let needle = Self::normalize(token);
        if needle.is_empty() {
            return None;
        }

        let normalized: Vec<String> = names.iter().map(|n| Self::normalize(n)).collect();

        // 1. 精确匹配
        if let Some(idx) = normalized.iter().position(|n| *n == needle) {
            return Some(idx);
        }

        // 2. 子串匹配
        if needle.len() >= MIN_SUBSTRING_LEN {
            if let Some(idx) = normalized
                .iter()
                .position(|n| !n.is_empty() && (n.contains(&needle) || needle.contains(n.as_str())))
            {
                return Some(idx);
            }
        }

        // 3. 姓氏匹配（唯一命中才接受, 同姓多人时放弃而不是猜）
        if let Some(last) = needle.split_whitespace().last() {
            let hits: Vec<usize> = normalized
                .iter()
                .enumerate()
                .filter(|(_, n)| n.split_whitespace().last() == Some(last))
                .map(|(i, _)| i)
                .collect();
            if hits.len() == 1 {
                return Some(hits[0]);
            }
        }

        // 4. 编辑距离比率
        let mut best: Option<(usize, f64)> = None;
        for (idx, n) in normalized.iter().enumerate() {
            if n.is_empty() {
                continue;
            }
            let score = normalized_levenshtein(&needle, n);
            match best {
                Some((_, s)) if score <= s => {}
                _ => best = Some((idx, score)),
            }
        }
        match best {
            Some((idx, score)) if score >= SIMILARITY_THRESHOLD => Some(idx),
            _ => None,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn names(list: &[&str]) -> Vec<String> {
        list.iter().map(|s| s.to_string()).collect()
    }

    #[test]
    fn test_normalize() {
        assert_eq!(NameMatcher::normalize("J.D. Martinez"), "jd martinez");
        assert_eq!(NameMatcher::normalize("  Ronald   Acuna Jr. "), "ronald acuna jr");
        assert_eq!(NameMatcher::normalize("O'Neill"), "oneill");
    }

    #[test]
    fn test_split_tokens_mixed_delimiters() {
        let tokens = NameMatcher::split_tokens("Judge, Betts; Ohtani | Soto\nTrout,,");
        assert_eq!(tokens, vec!["Judge", "Betts", "Ohtani", "Soto", "Trout"]);
    }

    #[test]
    fn test_exact_match_wins_over_substring() {
        let pool = names(&["Aaron Judge", "Aaron Judge Jr"]);
        assert_eq!(NameMatcher::find_best("aaron judge", &pool), Some(0));
    }

    #[test]
    fn test_substring_match() {
        let pool = names(&["Mookie Betts", "Juan Soto"]);
        assert_eq!(NameMatcher::find_best("Mookie", &pool), Some(0));
    }

    #[test]
    fn test_last_name_match_requires_uniqueness() {
        // 缩写名只能靠姓氏命中
        let pool = names(&["Fernando Tatis Jr", "Jose Ramirez"]);
        assert_eq!(NameMatcher::find_best("F. Tatis Jr", &pool), Some(0));

        // 同姓两人 → 姓氏匹配放弃, 编辑距离也不达标 → None
        let ambiguous = names(&["Aaron Judge", "Juan Soto", "Gregory Soto"]);
        assert_eq!(NameMatcher::find_best("Xx Soto", &ambiguous), None);
    }

    #[test]
    fn test_edit_distance_threshold() {
        let pool = names(&["Vladimir Guerrero"]);
        // 轻微拼写错误可接受
        assert_eq!(NameMatcher::find_best("Vladimir Guerero", &pool), Some(0));
        // 完全不相干的名字拒绝
        assert_eq!(NameMatcher::find_best("Zz Qq", &pool), None);
    }

    #[test]
    fn test_short_token_skips_substring() {
        let pool = names(&["Albert Almora"]);
        // 2 字符 token 不允许子串命中
        assert_eq!(NameMatcher::find_best("al", &pool), None);
    }

    #[test]
    fn test_empty_inputs() {
        assert_eq!(NameMatcher::find_best("  ", &names(&["Aaron Judge"])), None);
        assert_eq!(NameMatcher::find_best("Judge", &[]), None);
    }
}
