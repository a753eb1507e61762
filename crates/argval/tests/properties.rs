//! Property-based tests for tokenization and validation.

use proptest::prelude::*;

use argval::filter::IntegerFilter;
use argval::{Environment, Filter, Input, OptionDef, Validator, Value};

/// Tokens without the escape char, so every token is classified as-is.
fn token() -> impl Strategy<Value = String> {
    prop_oneof![
        "[a-z0-9]{1,6}",
        "-[a-z]{1,4}",
        "--[a-z]{1,4}",
        Just("-".to_string()),
        Just("--".to_string()),
    ]
}

fn argv() -> impl Strategy<Value = Vec<String>> {
    prop::collection::vec(token(), 0..20)
}

proptest! {
    #[test]
    fn every_token_lands_in_exactly_one_bucket(argv in argv()) {
        let env = Environment::default();
        match Input::tokenize(&argv, &env) {
            Ok(input) => {
                let option_tokens: usize = input.options().values().map(|v| 2 * v.len()).sum();
                // Flags form a set, so count flag tokens directly.
                let flag_tokens = argv
                    .iter()
                    .enumerate()
                    .filter(|(i, t)| {
                        t.starts_with('-')
                            && !t.starts_with("--")
                            && t.len() > 1
                            && !consumed_as_value(&argv, *i)
                    })
                    .count();
                prop_assert_eq!(
                    flag_tokens + option_tokens + input.arguments().len(),
                    argv.len()
                );
            }
            Err(_) => {
                // Only a trailing option without value is an error.
                let last = argv.last().expect("empty argv always tokenizes");
                prop_assert!(last.starts_with("--") && last.len() > 2);
                prop_assert!(!consumed_as_value(&argv, argv.len() - 1));
            }
        }
    }

    #[test]
    fn alias_and_primary_agree(value in -1000i64..1000, use_alias in any::<bool>()) {
        let mut v = Validator::new();
        v.add(
            OptionDef::new("count")
                .with_alias("n")
                .with_filter(IntegerFilter::new()),
        )
        .unwrap();
        let spelled = if use_alias { "--n" } else { "--count" };
        let raw = value.to_string();
        let out = v.parse([spelled, raw.as_str()]).unwrap();
        prop_assert_eq!(out.get_option("n"), Some(&Value::Int(value)));
        prop_assert_eq!(out.get_option("count"), out.get_option("n"));
    }

    #[test]
    fn hex_integers_round_trip(value in any::<i64>()) {
        let filter = IntegerFilter::new().with_radix(16).unwrap();
        let raw = if value < 0 {
            format!("-{:x}", value.unsigned_abs())
        } else {
            format!("{value:X}")
        };
        prop_assert_eq!(filter.parse(&raw).unwrap(), Value::Int(value));
    }
}

/// Whether token `i` is the value of the long option right before it.
fn consumed_as_value(argv: &[String], i: usize) -> bool {
    let mut j = 0;
    while j < argv.len() {
        let t = &argv[j];
        if t.starts_with("--") && t.len() > 2 {
            if j + 1 == i {
                return true;
            }
            j += 2;
        } else {
            j += 1;
        }
    }
    false
}
