use crate::{question::Choice, QuestionId};
use alloc::{collections::BTreeMap, string::ToString};
use core::fmt::{self, Formatter};
use serde::{
    de::{Error, IgnoredAny, MapAccess, SeqAccess, Visitor},
    Deserialize, Deserializer,
};

/// Answers submitted by a learner, keyed by question ID.
///
/// Parsing never rejects a submission. Entries whose key is not a question ID
/// or whose value is not exactly one of the integers `1` to `4` are dropped,
/// which leaves those questions unanswered. Anything other than a map parses
/// as an empty set of answers.
#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct Answers(BTreeMap<QuestionId, Choice>);

impl Answers {
    pub fn get(&self, question: QuestionId) -> Option<Choice> {
        self.0.get(&question).copied()
    }

    pub fn len(&self) -> usize {
        self.0.len()
    }

    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }
}

impl FromIterator<(QuestionId, Choice)> for Answers {
    fn from_iter<I: IntoIterator<Item = (QuestionId, Choice)>>(iter: I) -> Self {
        Self(iter.into_iter().collect())
    }
}

/// Question ID taken from a map key. JSON keys arrive as strings, and only the
/// canonical decimal spelling counts, so `"01"` or `"+1"` never alias `"1"`.
struct Key(Option<QuestionId>);

struct KeyVisitor;

impl<'de> Visitor<'de> for KeyVisitor {
    type Value = Key;

    fn expecting(&self, formatter: &mut Formatter) -> fmt::Result {
        formatter.write_str("a question ID")
    }

    fn visit_str<E: Error>(self, text: &str) -> Result<Self::Value, E> {
        Ok(Key(text.parse().ok().filter(|id: &QuestionId| id.to_string() == text)))
    }

    fn visit_i64<E: Error>(self, num: i64) -> Result<Self::Value, E> {
        Ok(Key(num.try_into().ok()))
    }

    fn visit_u64<E: Error>(self, num: u64) -> Result<Self::Value, E> {
        Ok(Key(num.try_into().ok()))
    }

    fn visit_bool<E: Error>(self, _: bool) -> Result<Self::Value, E> {
        Ok(Key(None))
    }

    fn visit_f64<E: Error>(self, _: f64) -> Result<Self::Value, E> {
        Ok(Key(None))
    }

    fn visit_unit<E: Error>(self) -> Result<Self::Value, E> {
        Ok(Key(None))
    }
}

impl<'de> Deserialize<'de> for Key {
    fn deserialize<D>(deserializer: D) -> Result<Self, D::Error>
    where
        D: Deserializer<'de>,
    {
        deserializer.deserialize_any(KeyVisitor)
    }
}

/// Selected option taken from a map value. Anything but an integral number in
/// range is treated as no selection at all.
struct Selection(Option<Choice>);

struct SelectionVisitor;

impl<'de> Visitor<'de> for SelectionVisitor {
    type Value = Selection;

    fn expecting(&self, formatter: &mut Formatter) -> fmt::Result {
        formatter.write_str("an option number from 1 to 4")
    }

    fn visit_u64<E: Error>(self, num: u64) -> Result<Self::Value, E> {
        Ok(Selection(u8::try_from(num).ok().and_then(Choice::new)))
    }

    fn visit_i64<E: Error>(self, num: i64) -> Result<Self::Value, E> {
        Ok(Selection(u8::try_from(num).ok().and_then(Choice::new)))
    }

    fn visit_f64<E: Error>(self, num: f64) -> Result<Self::Value, E> {
        // Saturating cast, so any fractional or out-of-range value fails the comparison.
        let marker = num as u8;
        Ok(Selection(if f64::from(marker) == num { Choice::new(marker) } else { None }))
    }

    fn visit_str<E: Error>(self, _: &str) -> Result<Self::Value, E> {
        Ok(Selection(None))
    }

    fn visit_bool<E: Error>(self, _: bool) -> Result<Self::Value, E> {
        Ok(Selection(None))
    }

    fn visit_unit<E: Error>(self) -> Result<Self::Value, E> {
        Ok(Selection(None))
    }

    fn visit_none<E: Error>(self) -> Result<Self::Value, E> {
        Ok(Selection(None))
    }

    fn visit_some<D>(self, deserializer: D) -> Result<Self::Value, D::Error>
    where
        D: Deserializer<'de>,
    {
        deserializer.deserialize_any(self)
    }

    fn visit_seq<A>(self, mut seq: A) -> Result<Self::Value, A::Error>
    where
        A: SeqAccess<'de>,
    {
        while seq.next_element::<IgnoredAny>()?.is_some() {}
        Ok(Selection(None))
    }

    fn visit_map<A>(self, mut map: A) -> Result<Self::Value, A::Error>
    where
        A: MapAccess<'de>,
    {
        while map.next_entry::<IgnoredAny, IgnoredAny>()?.is_some() {}
        Ok(Selection(None))
    }
}

impl<'de> Deserialize<'de> for Selection {
    fn deserialize<D>(deserializer: D) -> Result<Self, D::Error>
    where
        D: Deserializer<'de>,
    {
        deserializer.deserialize_any(SelectionVisitor)
    }
}

struct AnswersVisitor;

impl<'de> Visitor<'de> for AnswersVisitor {
    type Value = Answers;

    fn expecting(&self, formatter: &mut Formatter) -> fmt::Result {
        formatter.write_str("a map of question IDs to option numbers")
    }

    fn visit_map<A>(self, mut map: A) -> Result<Self::Value, A::Error>
    where
        A: MapAccess<'de>,
    {
        let mut answers = BTreeMap::new();
        while let Some((Key(key), Selection(selection))) = map.next_entry()? {
            match (key, selection) {
                (Some(question), Some(choice)) => {
                    answers.insert(question, choice);
                }
                // A later malformed duplicate withdraws an earlier answer.
                (Some(question), None) => {
                    answers.remove(&question);
                }
                (None, _) => {}
            }
        }
        Ok(Answers(answers))
    }

    fn visit_seq<A>(self, seq: A) -> Result<Self::Value, A::Error>
    where
        A: SeqAccess<'de>,
    {
        SelectionVisitor.visit_seq(seq)?;
        Ok(Answers::default())
    }

    fn visit_u64<E: Error>(self, _: u64) -> Result<Self::Value, E> {
        Ok(Answers::default())
    }

    fn visit_i64<E: Error>(self, _: i64) -> Result<Self::Value, E> {
        Ok(Answers::default())
    }

    fn visit_f64<E: Error>(self, _: f64) -> Result<Self::Value, E> {
        Ok(Answers::default())
    }

    fn visit_str<E: Error>(self, _: &str) -> Result<Self::Value, E> {
        Ok(Answers::default())
    }

    fn visit_bool<E: Error>(self, _: bool) -> Result<Self::Value, E> {
        Ok(Answers::default())
    }

    fn visit_unit<E: Error>(self) -> Result<Self::Value, E> {
        Ok(Answers::default())
    }

    fn visit_none<E: Error>(self) -> Result<Self::Value, E> {
        Ok(Answers::default())
    }

    fn visit_some<D>(self, deserializer: D) -> Result<Self::Value, D::Error>
    where
        D: Deserializer<'de>,
    {
        deserializer.deserialize_any(self)
    }
}

impl<'de> Deserialize<'de> for Answers {
    fn deserialize<D>(deserializer: D) -> Result<Self, D::Error>
    where
        D: Deserializer<'de>,
    {
        deserializer.deserialize_any(AnswersVisitor)
    }
}

#[cfg(test)]
mod tests {
    use super::{Answers, Choice};

    fn parse(json: &str) -> Answers {
        serde_json::from_str(json).unwrap()
    }

    #[test]
    fn accepts_string_keys_and_integer_values() {
        let answers = parse(r#"{"1": 2, "2": 4, "3": 1}"#);
        assert_eq!(answers.len(), 3);
        assert_eq!(answers.get(1), Some(Choice::Second));
        assert_eq!(answers.get(2), Some(Choice::Fourth));
        assert_eq!(answers.get(3), Some(Choice::First));
        assert_eq!(answers.get(4), None);
    }

    #[test]
    fn drops_malformed_entries() {
        let answers = parse(r#"{"1": 0, "2": 5, "3": "2", "4": 2.5, "5": [1], "6": {"a": 1}, "x": 3, "7": null, "8": 3.0}"#);
        assert_eq!(answers, [(8, Choice::Third)].into_iter().collect());
    }

    #[test]
    fn non_map_parses_as_empty() {
        assert!(parse("null").is_empty());
        assert!(parse("[1, 2, 3]").is_empty());
        assert!(parse("\"all of them\"").is_empty());
        assert!(parse("42").is_empty());
    }

    #[test]
    fn later_duplicate_wins() {
        assert_eq!(parse(r#"{"1": 2, "1": 3}"#).get(1), Some(Choice::Third));
        assert_eq!(parse(r#"{"1": 2, "1": "x"}"#).get(1), None);
    }

    #[test]
    fn only_canonical_keys_count() {
        let answers = parse(r#"{"1": 2, "01": 3, "+1": 4, " 1": 1, "1 ": 1}"#);
        assert_eq!(answers, [(1, Choice::Second)].into_iter().collect());
        assert_eq!(parse(r#"{"-0": 1, "0": 2, "-7": 3}"#), [(0, Choice::Second), (-7, Choice::Third)].into_iter().collect());
    }
}
