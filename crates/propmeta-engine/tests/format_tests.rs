use super::*;
use crate::fixtures::library;

#[test]
fn test_format_intrinsic_types() {
    let fx = library();
    let mut formatter = TypeFormatter::new(&*fx.store);

    assert_eq!(formatter.format(TypeId::OBJECT), "Object");
    assert_eq!(formatter.format(TypeId::STRING), "String");
    assert_eq!(formatter.format(TypeId::INT), "int");
    assert_eq!(formatter.format(TypeId::BOOLEAN), "boolean");
    assert_eq!(formatter.format(TypeId::VOID), "void");
}

#[test]
fn test_format_class_and_parameterized_types() {
    let fx = library();
    let types = fx.store.types();
    let mut formatter = TypeFormatter::new(&*fx.store);

    assert_eq!(formatter.format(fx.class_type(fx.address)), "Address");
    assert_eq!(
        formatter.format(types.parameterized(fx.boxed, [TypeId::STRING])),
        "Box<String>"
    );
    let matrix = types.parameterized(fx.list, [types.parameterized(fx.list, [TypeId::STRING])]);
    assert_eq!(formatter.format(matrix), "List<List<String>>");
}

#[test]
fn test_format_type_parameters_arrays_and_wildcards() {
    let fx = library();
    let types = fx.store.types();
    let mut formatter = TypeFormatter::new(&*fx.store);

    assert_eq!(formatter.format(fx.box_t), "T");
    assert_eq!(formatter.format(types.array(TypeId::STRING)), "String[]");
    assert_eq!(formatter.format(types.array(types.array(fx.box_t))), "T[][]");
    assert_eq!(formatter.format(types.unbounded_wildcard()), "?");
    assert_eq!(
        formatter.format(types.wildcard_extends(fx.class_type(fx.number))),
        "? extends Number"
    );
    assert_eq!(
        formatter.format(types.wildcard_super(TypeId::STRING)),
        "? super String"
    );
}

#[test]
fn test_format_nested_parameterized_type() {
    let fx = library();
    let types = fx.store.types();
    let mut formatter = TypeFormatter::new(&*fx.store);

    let outer = types.parameterized(fx.outer, [TypeId::STRING]);
    let nested = types.nested_parameterized(outer, fx.inner, [TypeId::INT]);
    assert_eq!(formatter.format(nested), "Outer<String>.Inner<int>");
}
