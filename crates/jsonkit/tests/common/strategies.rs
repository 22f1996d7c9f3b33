#![allow(dead_code)]

use jsonkit::value::{BigInt, ObjectBuilder};
use jsonkit::{Number, Value};
use proptest::prelude::*;

fn arb_scalar(with_null: bool) -> BoxedStrategy<Value> {
    let number = (-1_000i64..1_000, 0i32..3)
        .prop_map(|(unscaled, scale)| Value::Number(Number::new(BigInt::from(unscaled), scale)));
    let scalars = prop_oneof![
        any::<bool>().prop_map(Value::from),
        number,
        "[a-z]{0,4}".prop_map(Value::from),
    ];
    if with_null {
        prop_oneof![1 => Just(Value::Null), 4 => scalars].boxed()
    } else {
        scalars.boxed()
    }
}

fn arb_tree(with_null: bool) -> BoxedStrategy<Value> {
    arb_scalar(with_null)
        .prop_recursive(3, 32, 5, |inner| {
            prop_oneof![
                prop::collection::vec(inner.clone(), 0..5).prop_map(Value::array),
                prop::collection::vec(("[a-d]", inner), 0..5).prop_map(|entries| {
                    let mut b = ObjectBuilder::default();
                    b.extend(entries).expect("last-wins never rejects");
                    b.build()
                }),
            ]
        })
        .boxed()
}

/// Any small document.
pub fn arb_value() -> BoxedStrategy<Value> {
    arb_tree(true)
}

/// Documents without `null`, which merge patches cannot carry as a value.
pub fn arb_null_free_value() -> BoxedStrategy<Value> {
    arb_tree(false)
}
