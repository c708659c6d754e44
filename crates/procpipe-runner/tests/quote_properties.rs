use procpipe_runner::CommandSpec;
use procpipe_runner::quote::{QUOTE_TRIGGERS, command_line, needs_quoting, quote_arg};
use proptest::prelude::*;

proptest! {
    /// Arguments without a trigger character pass through untouched.
    #[test]
    fn prop_plain_arguments_unchanged(arg in "[A-Za-z0-9_./:@%*?#|<>\"\\\\-]*") {
        prop_assert!(!needs_quoting(&arg));
        prop_assert_eq!(quote_arg(&arg), arg);
    }

    /// Arguments with at least one trigger are wrapped in exactly one pair of
    /// quotes and the interior is byte-for-byte the input.
    #[test]
    fn prop_special_arguments_wrapped_once(
        prefix in "\\PC*",
        trigger in proptest::sample::select(QUOTE_TRIGGERS.to_vec()),
        suffix in "\\PC*",
    ) {
        let arg = format!("{prefix}{trigger}{suffix}");
        let quoted = quote_arg(&arg);

        prop_assert!(quoted.starts_with('"'));
        prop_assert!(quoted.ends_with('"'));
        prop_assert_eq!(quoted.len(), arg.len() + 2);
        prop_assert_eq!(&quoted[1..quoted.len() - 1], arg.as_str());
    }

    /// The flattened line is the quoted program followed by each quoted
    /// argument, in order, separated by single spaces.
    #[test]
    fn prop_command_line_preserves_argument_order(
        args in proptest::collection::vec("[a-z ]{0,8}", 0..8)
    ) {
        let cmd = CommandSpec::new("git").args(args.clone());
        let mut expected = String::from("git");
        for arg in &args {
            expected.push(' ');
            expected.push_str(&quote_arg(arg));
        }
        prop_assert_eq!(command_line(&cmd), expected);
    }
}

#[test]
fn test_trigger_set_matches_cmd_metacharacters() {
    let expected = " &()[]{}^=;!'+,`~";
    let actual: String = QUOTE_TRIGGERS.iter().collect();
    assert_eq!(actual, expected);
}
