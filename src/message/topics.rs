//! Topic targeting: a single topic or a boolean condition over topics.

use crate::error::{FcmError, Result};

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum Operator {
    And,
    Or,
}

impl Operator {
    fn as_str(&self) -> &'static str {
        match self {
            Operator::And => " && ",
            Operator::Or => " || ",
        }
    }
}

#[derive(Debug, Clone, PartialEq)]
enum Term {
    Topic(String),
    Group(Topics),
}

/// Rendered form of a topic expression
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum TopicTarget {
    /// `/topics/<name>`, used as the request's `to`
    Single(String),
    /// Condition string, used as the request's `condition`
    Condition(String),
}

/// Topic expression.
///
/// ```rust,ignore
/// // 'news' in topics && ('sport' in topics || 'weather' in topics)
/// let topics = Topics::new()
///     .topic("news")
///     .and_group(|g| g.topic("sport").or_topic("weather"));
/// ```
#[derive(Debug, Clone, Default, PartialEq)]
pub struct Topics {
    terms: Vec<(Option<Operator>, Term)>,
}

impl Topics {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn topic(mut self, name: impl Into<String>) -> Self {
        self.terms.push((None, Term::Topic(name.into())));
        self
    }

    pub fn and_topic(self, name: impl Into<String>) -> Self {
        self.push(Operator::And, Term::Topic(name.into()))
    }

    pub fn or_topic(self, name: impl Into<String>) -> Self {
        self.push(Operator::Or, Term::Topic(name.into()))
    }

    /// Append a parenthesised sub-expression joined with `&&`
    pub fn and_group<F>(self, nest: F) -> Self
    where
        F: FnOnce(Topics) -> Topics,
    {
        self.push_group(Operator::And, nest)
    }

    /// Append a parenthesised sub-expression joined with `||`
    pub fn or_group<F>(self, nest: F) -> Self
    where
        F: FnOnce(Topics) -> Topics,
    {
        self.push_group(Operator::Or, nest)
    }

    fn push(mut self, operator: Operator, term: Term) -> Self {
        self.terms.push((Some(operator), term));
        self
    }

    fn push_group<F>(self, operator: Operator, nest: F) -> Self
    where
        F: FnOnce(Topics) -> Topics,
    {
        let group = nest(Topics::new());
        // An empty group contributes nothing
        if group.terms.is_empty() {
            return self;
        }
        self.push(operator, Term::Group(group))
    }

    pub fn is_empty(&self) -> bool {
        self.terms.is_empty()
    }

    /// True when the expression is exactly one plain topic
    pub fn has_only_one_topic(&self) -> bool {
        matches!(self.terms.as_slice(), [(_, Term::Topic(_))])
    }

    pub fn build(&self) -> Result<TopicTarget> {
        match self.terms.as_slice() {
            [] => Err(FcmError::NoTopicProvided),
            [(_, Term::Topic(name))] => Ok(TopicTarget::Single(format!("/topics/{}", name))),
            _ => Ok(TopicTarget::Condition(self.condition())),
        }
    }

    fn condition(&self) -> String {
        let mut out = String::new();
        for (index, (operator, term)) in self.terms.iter().enumerate() {
            // The first term never carries a leading operator
            if index > 0 {
                out.push_str(operator.unwrap_or(Operator::And).as_str());
            }
            match term {
                Term::Topic(name) => {
                    out.push('\'');
                    out.push_str(name);
                    out.push_str("' in topics");
                }
                Term::Group(group) => {
                    out.push('(');
                    out.push_str(&group.condition());
                    out.push(')');
                }
            }
        }
        out
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_single_topic() {
        let topics = Topics::new().topic("news");
        assert!(topics.has_only_one_topic());
        assert_eq!(
            topics.build().unwrap(),
            TopicTarget::Single("/topics/news".to_string())
        );
    }

    #[test]
    fn test_empty_topics_fail() {
        assert!(matches!(Topics::new().build(), Err(FcmError::NoTopicProvided)));
        // A group with nothing inside is still empty
        let topics = Topics::new().and_group(|g| g);
        assert!(topics.is_empty());
        assert!(matches!(topics.build(), Err(FcmError::NoTopicProvided)));
    }

    #[test]
    fn test_flat_condition() {
        let topics = Topics::new().topic("a").and_topic("b").or_topic("c");
        assert!(!topics.has_only_one_topic());
        assert_eq!(
            topics.build().unwrap(),
            TopicTarget::Condition(
                "'a' in topics && 'b' in topics || 'c' in topics".to_string()
            )
        );
    }

    #[test]
    fn test_nested_condition() {
        let topics = Topics::new()
            .topic("news")
            .and_group(|g| g.topic("sport").or_topic("weather"));
        assert_eq!(
            topics.build().unwrap(),
            TopicTarget::Condition(
                "'news' in topics && ('sport' in topics || 'weather' in topics)".to_string()
            )
        );
    }

    #[test]
    fn test_leading_operator_ignored() {
        let topics = Topics::new().or_topic("a").and_topic("b");
        assert_eq!(
            topics.build().unwrap(),
            TopicTarget::Condition("'a' in topics && 'b' in topics".to_string())
        );
    }

    #[test]
    fn test_single_group_is_a_condition() {
        let topics = Topics::new().or_group(|g| g.topic("a"));
        assert!(!topics.has_only_one_topic());
        assert_eq!(
            topics.build().unwrap(),
            TopicTarget::Condition("('a' in topics)".to_string())
        );
    }
}
