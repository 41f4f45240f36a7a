//! 英文词性标注（本地启发式）
//!
//! 封闭类词（停用词、助动词、限定词、代词）直接排除；
//! 其余依次查音效词汇表、后缀规则，最后默认名词。

use crate::text::{is_number, is_punctuation, split_latin_words, ENGLISH_STOPWORDS};
use crate::types::Pos;
use lazy_static::lazy_static;
use std::collections::HashMap;

lazy_static! {
    static ref LEXICON: HashMap<&'static str, Pos> = {
        let nouns = [
            "door", "footstep", "step", "glass", "wind", "rain", "water", "car", "engine",
            "gun", "shot", "explosion", "thunder", "fire", "bird", "dog", "cat", "crowd",
            "voice", "scream", "laugh", "metal", "wood", "paper", "cloth", "bell", "alarm",
            "clock", "phone", "keyboard", "mouse", "train", "plane", "boat", "wave", "ocean",
            "river", "stream", "forest", "city", "traffic", "room", "tone", "beep", "click",
            "hit", "impact", "punch", "kick", "sword", "knife", "whoosh", "swoosh", "ambience",
            "ambient", "atmosphere", "drone", "hum", "buzz", "noise", "static", "snow", "ice",
            "stone", "rock", "gravel", "dirt", "sand", "grass", "leaf", "leaves", "branch",
            "tree", "chain", "key", "lock", "drawer", "window", "floor", "wall", "roof",
            "machine", "motor", "tool", "hammer", "saw", "drill", "magic", "spell", "laser",
            "robot", "monster", "creature", "horse", "cow", "insect", "fly", "bee",
        ];
        let verbs = [
            "slam", "open", "close", "shut", "knock", "drop", "break", "crash", "smash",
            "shatter", "walk", "run", "jump", "fall", "roll", "slide", "scrape", "rub",
            "pour", "splash", "drip", "boil", "burn", "crackle", "creak", "squeak", "ring",
            "tick", "blow", "howl", "whistle", "fire", "shoot", "reload", "cock", "swing",
            "throw", "grab", "tear", "rip", "crumple", "fold", "flip", "type", "press",
            "pass", "pass-by", "approach", "start", "stop", "idle", "rev", "accelerate",
        ];
        let adjectives = [
            "heavy", "light", "loud", "soft", "quiet", "big", "small", "large", "tiny",
            "huge", "distant", "close", "near", "far", "fast", "slow", "short", "long",
            "deep", "high", "low", "wet", "dry", "hard", "wooden", "metallic", "electric",
            "old", "new", "dark", "bright", "harsh", "gentle", "sharp", "dull", "thick",
            "thin", "hollow", "muffled", "distorted", "clean", "dirty", "rough", "smooth",
            "interior", "exterior", "indoor", "outdoor", "mono", "stereo",
        ];
        let adverbs = [
            "slowly", "quickly", "gently", "loudly", "softly", "away", "back", "again",
            "repeatedly", "continuously",
        ];

        let mut map = HashMap::new();
        // 后写入的覆盖先写入的：名词优先
        for w in adverbs {
            map.insert(w, Pos::Adverb);
        }
        for w in verbs {
            map.insert(w, Pos::Verb);
        }
        for w in adjectives {
            map.insert(w, Pos::Adjective);
        }
        for w in nouns {
            map.insert(w, Pos::Noun);
        }
        map
    };
}

/// 单个英文词的词性
pub fn guess_pos(word: &str) -> Pos {
    let lower = word.to_lowercase();

    if is_number(&lower) || is_punctuation(&lower) {
        return Pos::Other;
    }
    if let Some(pos) = LEXICON.get(lower.as_str()) {
        return *pos;
    }
    // 复数形式查表
    if let Some(singular) = lower.strip_suffix('s') {
        if let Some(Pos::Noun) = LEXICON.get(singular) {
            return Pos::Noun;
        }
    }

    let len = lower.chars().count();
    if len > 4 && lower.ends_with("ly") {
        return Pos::Adverb;
    }
    if len > 5 && (lower.ends_with("ing") || lower.ends_with("ed")) {
        return Pos::Verb;
    }
    const ADJ_SUFFIXES: [&str; 7] = ["ful", "ous", "ive", "less", "able", "ical", "ish"];
    if len > 4 && ADJ_SUFFIXES.iter().any(|s| lower.ends_with(s)) {
        return Pos::Adjective;
    }
    if len > 4 && lower.ends_with('y') && !lower.ends_with("ey") && !lower.ends_with("ay") {
        return Pos::Adjective;
    }

    Pos::Noun
}

/// 英文文本 → (词, 词性) 列表（小写，已排除封闭类词）
pub fn tag(text: &str) -> Vec<(String, Pos)> {
    split_latin_words(text)
        .into_iter()
        .map(|w| w.to_lowercase())
        .filter(|w| !ENGLISH_STOPWORDS.contains(w.as_str()))
        .map(|w| {
            let pos = guess_pos(&w);
            (w, pos)
        })
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_guess_pos_lexicon() {
        assert_eq!(guess_pos("Door"), Pos::Noun);
        assert_eq!(guess_pos("slam"), Pos::Verb);
        assert_eq!(guess_pos("heavy"), Pos::Adjective);
        assert_eq!(guess_pos("slowly"), Pos::Adverb);
        assert_eq!(guess_pos("footsteps"), Pos::Noun);
    }

    #[test]
    fn test_guess_pos_suffix_rules() {
        assert_eq!(guess_pos("rattling"), Pos::Verb);
        assert_eq!(guess_pos("creaked"), Pos::Verb);
        assert_eq!(guess_pos("powerful"), Pos::Adjective);
        assert_eq!(guess_pos("crunchy"), Pos::Adjective);
        assert_eq!(guess_pos("awkwardly"), Pos::Adverb);
        assert_eq!(guess_pos("kettle"), Pos::Noun);
        assert_eq!(guess_pos("01"), Pos::Other);
    }

    #[test]
    fn test_tag_excludes_closed_class() {
        let tagged = tag("The heavy door was slammed on a table");
        let words: Vec<&str> = tagged.iter().map(|(w, _)| w.as_str()).collect();
        assert_eq!(words, vec!["heavy", "door", "slammed", "table"]);
    }

    #[test]
    fn test_tag_underscore_and_camel_case() {
        let tagged = tag("DoorSlam_heavy");
        assert_eq!(tagged[0], ("door".to_string(), Pos::Noun));
        assert_eq!(tagged[1], ("slam".to_string(), Pos::Verb));
        assert_eq!(tagged[2], ("heavy".to_string(), Pos::Adjective));
    }
}
