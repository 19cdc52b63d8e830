use std::fmt::Display;
use std::fmt::Formatter;

/// A single line of an explanation log: the explanations of one depth (explanation size) or one
/// level (tree depth at discovery).
///
/// Rendered as `index;count;seconds[-TIMEOUT][-ERROR];{e1,e2,...}`, where the seconds are
/// printed with two decimals.
#[derive(Clone, Debug, PartialEq)]
pub struct Record {
    pub index: usize,
    pub seconds: f64,
    pub timed_out: bool,
    pub errored: bool,
    /// The rendered explanations, e.g. `{A(a),¬B(a)}`.
    pub explanations: Vec<String>,
}

impl Record {
    pub fn count(&self) -> usize {
        self.explanations.len()
    }
}

impl Display for Record {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        write!(f, "{};{};{:.2}", self.index, self.count(), self.seconds)?;

        if self.timed_out {
            write!(f, "-TIMEOUT")?;
        }
        if self.errored {
            write!(f, "-ERROR")?;
        }

        write!(f, ";{{{}}}", self.explanations.join(","))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn record_with_flags_is_rendered() {
        let record = Record {
            index: 2,
            seconds: 1.234,
            timed_out: true,
            errored: true,
            explanations: vec!["{A(a),B(a)}".to_owned(), "{C(a),D(a)}".to_owned()],
        };

        assert_eq!(
            "2;2;1.23-TIMEOUT-ERROR;{{A(a),B(a)},{C(a),D(a)}}",
            record.to_string()
        );
    }

    #[test]
    fn empty_record_is_rendered() {
        let record = Record {
            index: 0,
            seconds: 0.0,
            timed_out: false,
            errored: false,
            explanations: vec![],
        };

        assert_eq!("0;0;0.00;{}", record.to_string());
    }
}
