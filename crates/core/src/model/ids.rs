use serde::{Deserialize, Deserializer, Serialize, Serializer};
use std::cmp::Ordering;
use std::fmt;
use std::hash::{Hash, Hasher};
use uuid::Uuid;

/// Identifier of a question as issued by the question bank.
///
/// The bank may hand out numeric or textual ids. Lookups compare the string
/// form, so `7` and `"7"` name the same question, while serialization writes
/// the id back in the form it arrived in.
#[derive(Clone)]
pub struct QuestionId {
    value: String,
    wire: WireForm,
}

#[derive(Clone, Copy, PartialEq, Eq)]
enum WireForm {
    Text,
    Unsigned(u64),
    Signed(i64),
}

impl QuestionId {
    #[must_use]
    pub fn new(id: impl Into<String>) -> Self {
        Self {
            value: id.into(),
            wire: WireForm::Text,
        }
    }

    #[must_use]
    pub fn as_str(&self) -> &str {
        &self.value
    }

    /// Whether the bank issued this id as a JSON number.
    #[must_use]
    pub fn is_numeric(&self) -> bool {
        self.wire != WireForm::Text
    }
}

impl From<u64> for QuestionId {
    fn from(value: u64) -> Self {
        Self {
            value: value.to_string(),
            wire: WireForm::Unsigned(value),
        }
    }
}

impl From<&str> for QuestionId {
    fn from(value: &str) -> Self {
        Self::new(value)
    }
}

impl PartialEq for QuestionId {
    fn eq(&self, other: &Self) -> bool {
        self.value == other.value
    }
}

impl Eq for QuestionId {}

impl Hash for QuestionId {
    fn hash<H: Hasher>(&self, state: &mut H) {
        self.value.hash(state);
    }
}

impl PartialOrd for QuestionId {
    fn partial_cmp(&self, other: &Self) -> Option<Ordering> {
        Some(self.cmp(other))
    }
}

impl Ord for QuestionId {
    fn cmp(&self, other: &Self) -> Ordering {
        self.value.cmp(&other.value)
    }
}

impl Serialize for QuestionId {
    fn serialize<S>(&self, serializer: S) -> Result<S::Ok, S::Error>
    where
        S: Serializer,
    {
        match self.wire {
            WireForm::Text => serializer.serialize_str(&self.value),
            WireForm::Unsigned(n) => serializer.serialize_u64(n),
            WireForm::Signed(n) => serializer.serialize_i64(n),
        }
    }
}

impl<'de> Deserialize<'de> for QuestionId {
    fn deserialize<D>(deserializer: D) -> Result<Self, D::Error>
    where
        D: Deserializer<'de>,
    {
        #[derive(Deserialize)]
        #[serde(untagged)]
        enum RawId {
            Text(String),
            Unsigned(u64),
            Signed(i64),
        }

        Ok(match RawId::deserialize(deserializer)? {
            RawId::Text(text) => Self::new(text),
            RawId::Unsigned(n) => Self::from(n),
            RawId::Signed(n) => Self {
                value: n.to_string(),
                wire: WireForm::Signed(n),
            },
        })
    }
}

/// Identifier of one test attempt, attached to logs and the final report.
#[derive(Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct SessionId(Uuid);

impl SessionId {
    /// Creates a fresh random `SessionId`.
    #[must_use]
    pub fn new() -> Self {
        Self(Uuid::new_v4())
    }

    #[must_use]
    pub fn from_uuid(id: Uuid) -> Self {
        Self(id)
    }

    #[must_use]
    pub fn value(&self) -> Uuid {
        self.0
    }
}

impl Default for SessionId {
    fn default() -> Self {
        Self::new()
    }
}

impl fmt::Debug for QuestionId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "QuestionId({})", self.value)
    }
}

impl fmt::Debug for SessionId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "SessionId({})", self.0)
    }
}

// ─── Display Implementations ───────────────────────────────────────────────────

impl fmt::Display for QuestionId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.value)
    }
}

impl fmt::Display for SessionId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}
