//! Parameter binding tests through the public API.

use ora_bind::bind::{
    bind_parameters, BindValue, Binder, DataType, ParameterDescriptor, SequentialSuffix,
};
use ora_bind::config::NodeDefinition;
use pretty_assertions::assert_eq;

#[test]
fn test_expanded_list_has_one_entry_per_piece() {
    for (raw, expected) in [
        ("1", vec!["1"]),
        ("a,b", vec!["a", "b"]),
        ("x, y ,z,  w", vec!["x", "y", "z", "w"]),
    ] {
        let bound = Binder::with_generator(SequentialSuffix::new()).bind(
            "SELECT * FROM t WHERE c IN :vals",
            &[ParameterDescriptor::list("vals", raw, DataType::String)],
        );

        let placeholders: Vec<String> = (1..=expected.len()).map(|i| format!(":vals_{i}")).collect();
        assert_eq!(
            bound.sql,
            format!("SELECT * FROM t WHERE c IN ({})", placeholders.join(","))
        );
        assert_eq!(bound.binds.len(), expected.len());
        for (i, value) in expected.iter().enumerate() {
            assert_eq!(
                bound.binds[&format!("vals_{}", i + 1)].value,
                BindValue::Text(value.to_string())
            );
        }
    }
}

#[test]
fn test_definition_file_binds_like_host_input() {
    let def = NodeDefinition::from_toml(
        r#"
query = "SELECT id, name FROM product WHERE id < :max_id AND category IN (:cats)"

[[params]]
name = "max_id"
value = 100
datatype = "number"

[[params]]
name = "cats"
value = "tools, toys"
parseInStatement = true
"#,
    )
    .unwrap();

    let bound = Binder::with_generator(SequentialSuffix::new()).bind(&def.query, &def.params);

    assert_eq!(
        bound.sql,
        "SELECT id, name FROM product WHERE id < :max_id AND category IN ((:cats_1,:cats_2))"
    );
    assert_eq!(bound.binds["max_id"].value, BindValue::Number(100.0));
    assert_eq!(bound.binds["cats_1"].value, BindValue::Text("tools".to_string()));
    assert_eq!(bound.binds["cats_2"].value, BindValue::Text("toys".to_string()));
}

#[test]
fn test_random_suffixes_never_collide_across_descriptors() {
    let bound = bind_parameters(
        "SELECT * FROM t WHERE a IN :p AND b IN :q",
        &[
            ParameterDescriptor::list("p", "1,1,1", DataType::Number),
            ParameterDescriptor::list("q", "1,1,1", DataType::Number),
        ],
    );

    assert_eq!(bound.binds.len(), 6);
    assert_eq!(bound.placeholder_names().len(), 6);
    assert!(bound
        .binds
        .values()
        .all(|p| p.value == BindValue::Number(1.0)));
}

#[test]
fn test_unknown_name_is_bound_but_not_substituted() {
    let bound = bind_parameters(
        "SELECT * FROM t",
        &[ParameterDescriptor::list("absent", "1,2", DataType::Number)],
    );

    assert_eq!(bound.sql, "SELECT * FROM t");
    assert_eq!(bound.binds.len(), 2);
}
