//! Create, fill, refill, and reject.

use crate::common::*;

#[test]
fn double_variable_lifecycle() {
    let mut cdf = Cdf::new();
    let var = cdf.add_variable("x", VariableOptions::new()).unwrap();

    let t = var
        .set_from_values(vec![1i64, 2, 3, 4], Some(ScalarType::Double))
        .unwrap();
    assert_eq!(t, ScalarType::Double);

    let t = var.set_from_values(vec![5.0f64, 6.0, 7.0, 8.0], None).unwrap();
    assert_eq!(t, ScalarType::Double);
    assert_eq!(
        var.values().and_then(|b| b.values::<f64>()),
        Some(&[5.0, 6.0, 7.0, 8.0][..])
    );

    let err = var.set_from_values(vec!["a", "b"], None).unwrap_err();
    assert_eq!(
        err,
        Error::TypeIncompatibility {
            existing: ScalarType::Double,
            candidate: ScalarType::Char,
        }
    );
    assert_eq!(var.scalar_type(), ScalarType::Double);
    assert_eq!(var.len(), 4);
}

#[test]
fn variable_with_attributes_and_time_axis() {
    let mut cdf = Cdf::new();
    let times = vec![
        instant(2020, 1, 1, 0, 0, 0, 0),
        instant(2020, 1, 1, 0, 0, 1, 0),
    ];
    cdf.add_variable(
        "epoch",
        VariableOptions::new()
            .values(times.clone())
            .attribute("UNITS", "ns")
            .attribute("VALIDMIN", vec![times[0]]),
    )
    .unwrap();
    cdf.add_attribute("Project", vec![Value::from("demo")]).unwrap();

    let var = cdf.get("epoch").unwrap();
    assert_eq!(var.scalar_type(), ScalarType::TimeTt2000);
    assert_eq!(var.to_instants().unwrap(), times);
    assert_eq!(
        var.attribute("VALIDMIN").map(|a| a.scalar_type()),
        Some(ScalarType::TimeTt2000)
    );
    assert_eq!(
        cdf.attribute("Project")
            .and_then(|a| a.entry(0))
            .and_then(|e| e.as_str()),
        Some("demo".to_string())
    );
}

#[test]
fn copy_between_variables() {
    let mut cdf = Cdf::new();
    cdf.add_variable("a", VariableOptions::new().values(vec![1i16, 2, 3]))
        .unwrap();
    cdf.add_variable("b", VariableOptions::new()).unwrap();

    let source = cdf.get("a").cloned().unwrap();
    let target = cdf.get_mut("b").unwrap();
    assert_eq!(target.set_from_existing(&source).unwrap(), ScalarType::Int2);
    assert_eq!(target.values(), source.values());
}
