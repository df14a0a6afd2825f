use super::*;
use crate::types::TypeData;

#[test]
fn test_def_id_validity() {
    assert!(!DefId::INVALID.is_valid());
    assert!(DefId(1).is_valid());
    assert!(DefId(100).is_valid());
}

#[test]
fn test_register_and_get() {
    let store = ClassStore::new();

    let id = store.register(
        ClassInfo::class("Address")
            .with_method(MethodInfo::getter("getStreet", TypeId::STRING))
            .with_field(FieldInfo::new("street", TypeId::STRING)),
    );

    assert!(id.is_valid());
    assert!(store.contains(id));
    assert_eq!(store.len(), 1);

    let info = store.get(id).expect("class is defined");
    assert_eq!(&*info.name, "Address");
    assert_eq!(info.kind, ClassKind::Class);
    assert_eq!(info.methods.len(), 1);
    assert_eq!(info.methods[0].declaring, id);
    assert!(info.field("street").is_some());
    assert!(info.field("city").is_none());
}

#[test]
fn test_reserve_then_define_generic_class() {
    let store = ClassStore::new();

    let boxed = store.reserve("Box");
    assert!(store.is_reserved(boxed));
    assert!(!store.contains(boxed));
    assert_eq!(store.name_of(boxed).as_deref(), Some("Box"));

    let t = store.types().type_param(boxed, 0, "T");
    store.define(
        boxed,
        ClassInfo::class("Box")
            .with_type_params(vec![TypeParamDecl::new(t)])
            .with_method(MethodInfo::getter("getValue", t))
            .with_method(MethodInfo::setter("setValue", t)),
    );

    let info = store.get(boxed).expect("class is defined");
    assert_eq!(info.type_params, vec![TypeParamDecl::new(t)]);
    assert!(info.methods.iter().all(|m| m.declaring == boxed));
    assert!(matches!(
        store.types().lookup(info.methods[0].return_type),
        Some(TypeData::TypeParameter(_))
    ));
}

#[test]
fn test_method_builders() {
    let getter = MethodInfo::getter("getName", TypeId::STRING);
    assert_eq!(getter.arity(), 0);
    assert_eq!(getter.return_type, TypeId::STRING);
    assert!(!getter.is_synthetic());
    assert!(getter.body.is_abstract());

    let bridge = MethodInfo::setter("setName", TypeId::OBJECT).synthetic();
    assert_eq!(bridge.arity(), 1);
    assert_eq!(bridge.return_type, TypeId::VOID);
    assert!(bridge.is_synthetic());
}

#[test]
fn test_annotations() {
    let field = FieldInfo::new("email", TypeId::STRING).with_annotation(
        Annotation::new("Column")
            .with_value("name", "EMAIL_ADDR")
            .with_value("nullable", "false"),
    );

    let column = field.annotation("Column").expect("annotation present");
    assert_eq!(column.value("name"), Some("EMAIL_ADDR"));
    assert_eq!(column.value("nullable"), Some("false"));
    assert_eq!(column.value("length"), None);
    let keys: Vec<&str> = column.values.keys().map(|k| &**k).collect();
    assert_eq!(keys, vec!["name", "nullable"]);
    assert!(field.annotation("Id").is_none());
}

#[test]
fn test_modules_and_unload() {
    let store = ClassStore::new();
    let plugin = ModuleId(7);

    let core = store.register(ClassInfo::class("Core"));
    let a = store.register(ClassInfo::class("PluginA").with_module(plugin));
    let b = store.register(ClassInfo::class("PluginB").with_module(plugin));

    assert_eq!(store.classes_in_module(plugin), vec![a, b]);
    assert_eq!(store.classes_in_module(ModuleId::ROOT), vec![core]);

    let removed = store.unload_module(plugin);
    assert_eq!(removed, vec![a, b]);
    assert!(!store.contains(a));
    assert!(!store.is_reserved(b));
    assert!(store.contains(core));
    assert!(store.classes_in_module(plugin).is_empty());
}

#[test]
fn test_redefine_moves_module() {
    let store = ClassStore::new();
    let id = store.register(ClassInfo::class("Moving"));

    store.define(id, ClassInfo::class("Moving").with_module(ModuleId(3)));

    assert!(store.classes_in_module(ModuleId::ROOT).is_empty());
    assert_eq!(store.classes_in_module(ModuleId(3)), vec![id]);
    assert_eq!(store.len(), 1);
}
