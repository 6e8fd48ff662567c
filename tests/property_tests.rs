use method_stub::{MethodTable, MockEngine, MockError, Subject, Value};
use proptest::prelude::*;

struct Echo;

impl Echo {
    fn pair(&self, a: i32, b: String) -> usize {
        a.unsigned_abs() as usize + b.len()
    }

    fn flag(&self, on: bool) -> bool {
        !on
    }
}

impl Subject for Echo {
    fn methods(table: &mut MethodTable<Self>) {
        table.method("pair", Echo::pair).method("flag", Echo::flag);
    }
}

#[derive(Debug, Clone)]
enum Call {
    Pair(i32, String),
    Flag(bool),
}

impl Call {
    fn method(&self) -> &'static str {
        match self {
            Call::Pair(..) => "pair",
            Call::Flag(_) => "flag",
        }
    }

    fn args(&self) -> Vec<Value> {
        match self {
            Call::Pair(a, b) => vec![Value::new(*a), Value::new(b.clone())],
            Call::Flag(on) => vec![Value::new(*on)],
        }
    }
}

fn call_strategy() -> impl Strategy<Value = Call> {
    prop_oneof![
        (any::<i32>(), "[a-z]{0,8}").prop_map(|(a, b)| Call::Pair(a, b)),
        any::<bool>().prop_map(Call::Flag),
    ]
}

proptest! {
    #[test]
    fn test_every_call_appends_exactly_its_args(calls in prop::collection::vec(call_strategy(), 0..40)) {
        let engine = MockEngine::new(Echo);
        for call in &calls {
            engine.call(call.method(), call.args()).unwrap();
        }

        for method in ["pair", "flag"] {
            let expected: Vec<Vec<Value>> = calls
                .iter()
                .filter(|c| c.method() == method)
                .map(Call::args)
                .collect();
            let all = engine.all_call_args(method);

            prop_assert_eq!(&all, &expected);
            prop_assert_eq!(engine.method_call_count(method), expected.len());
            for (i, tuple) in all.iter().enumerate() {
                prop_assert_eq!(&engine.call_args(method, i).unwrap(), tuple);
            }
            let out_of_range = matches!(
                engine.call_args(method, all.len()),
                Err(MockError::OutOfRange { .. })
            );
            prop_assert!(out_of_range);
            match all.last() {
                Some(last) => prop_assert_eq!(&engine.last_call_args(method).unwrap(), last),
                None => {
                    let no_calls = matches!(
                        engine.last_call_args(method),
                        Err(MockError::NoCalls { .. })
                    );
                    prop_assert!(no_calls);
                }
            }
        }
    }

    #[test]
    fn test_was_called_with_matches_recorded_tuples(
        calls in prop::collection::vec(call_strategy(), 0..20),
        probe in call_strategy(),
    ) {
        let engine = MockEngine::new(Echo);
        for call in &calls {
            engine.call(call.method(), call.args()).unwrap();
        }

        let recorded = calls
            .iter()
            .any(|c| c.method() == probe.method() && c.args() == probe.args());
        prop_assert_eq!(
            engine.was_method_called_with(probe.method(), &probe.args()),
            recorded
        );
    }

    #[test]
    fn test_stub_then_unstub_round_trips(a in any::<i32>(), b in "[a-z]{0,8}") {
        let engine = MockEngine::new(Echo);
        engine.stub("pair", |_: &Echo, _: i32, _: String| 0usize).unwrap();
        prop_assert!(engine.is_stubbed("pair"));
        let stubbed: usize = engine.call_as("pair", vec![Value::new(a), Value::new(b.clone())]).unwrap();
        prop_assert_eq!(stubbed, 0);

        engine.unstub("pair");
        prop_assert!(!engine.is_stubbed("pair"));
        let real: usize = engine.call_as("pair", vec![Value::new(a), Value::new(b.clone())]).unwrap();
        prop_assert_eq!(real, a.unsigned_abs() as usize + b.len());
        prop_assert_eq!(engine.method_call_count("pair"), 2);
    }
}
