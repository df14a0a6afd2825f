use super::*;
use crate::def::{ClassInfo, ClassStore};
use crate::fixtures::library;
use crate::types::{TypeId, TypeParamDecl};

fn method(store: &ClassStore, def: DefId, name: &str, synthetic: bool) -> Arc<MethodInfo> {
    store
        .declared_methods_of(def)
        .into_iter()
        .find(|m| &*m.name == name && m.is_synthetic() == synthetic)
        .unwrap_or_else(|| panic!("no method {name} (synthetic={synthetic})"))
}

#[test]
fn test_non_synthetic_method_is_not_a_bridge() {
    let fx = library();
    let real = method(&fx.store, fx.string_holder, "getItem", false);
    assert!(find_bridged_method(&*fx.store, &real).is_none());
}

#[test]
fn test_getter_bridge_resolves_to_concrete_override() {
    let fx = library();
    let bridge = method(&fx.store, fx.string_holder, "getItem", true);

    let bridged = find_bridged_method(&*fx.store, &bridge).expect("bridged method");
    assert!(!bridged.is_synthetic());
    assert_eq!(bridged.declaring, fx.string_holder);
    assert_eq!(bridged.return_type, TypeId::STRING);
}

#[test]
fn test_setter_bridge_resolves_through_generic_declaration() {
    let fx = library();
    let bridge = method(&fx.store, fx.string_holder, "setItem", true);

    let bridged = find_bridged_method(&*fx.store, &bridge).expect("bridged method");
    assert_eq!(bridged.declaring, fx.string_holder);
    assert_eq!(bridged.params.as_slice(), &[TypeId::STRING]);
}

#[test]
fn test_single_candidate_wins_outright() {
    let store = ClassStore::new();
    let only = store.register(
        ClassInfo::class("Only")
            .with_method(MethodInfo::getter("getCount", TypeId::INT))
            .with_method(MethodInfo::getter("getCount", TypeId::OBJECT).synthetic()),
    );
    let bridge = method(&store, only, "getCount", true);

    let bridged = find_bridged_method(&store, &bridge).expect("bridged method");
    assert_eq!(bridged.return_type, TypeId::INT);
}

#[test]
fn test_bridge_without_candidates() {
    let store = ClassStore::new();
    let lonely = store.register(
        ClassInfo::class("Lonely").with_method(MethodInfo::getter("getX", TypeId::OBJECT).synthetic()),
    );
    let bridge = method(&store, lonely, "getX", true);
    assert!(find_bridged_method(&store, &bridge).is_none());
}

#[test]
fn test_generic_declaration_found_on_interface() {
    let store = ClassStore::new();
    let types = store.types();

    // interface Sink<T> { void setValue(T) }
    // class Bin implements Sink<String> { setValue(String); setValue(long); bridge setValue(Object) }
    let sink = store.reserve("Sink");
    let t = types.type_param(sink, 0, "T");
    store.define(
        sink,
        ClassInfo::interface("Sink")
            .with_type_params(vec![TypeParamDecl::new(t)])
            .with_method(MethodInfo::setter("setValue", t)),
    );
    let bin = store.register(
        ClassInfo::class("Bin")
            .with_interfaces(vec![types.parameterized(sink, [TypeId::STRING])])
            .with_method(MethodInfo::setter("setValue", TypeId::LONG))
            .with_method(MethodInfo::setter("setValue", TypeId::STRING))
            .with_method(MethodInfo::setter("setValue", TypeId::OBJECT).synthetic()),
    );
    let bridge = method(&store, bin, "setValue", true);

    let bridged = find_bridged_method(&store, &bridge).expect("bridged method");
    assert_eq!(bridged.params.as_slice(), &[TypeId::STRING]);
}

#[test]
fn test_ambiguous_candidates_yield_none() {
    let store = ClassStore::new();
    let odd = store.register(
        ClassInfo::class("Odd")
            .with_method(MethodInfo::setter("setValue", TypeId::LONG))
            .with_method(MethodInfo::setter("setValue", TypeId::INT))
            .with_method(MethodInfo::setter("setValue", TypeId::OBJECT).synthetic()),
    );
    let bridge = method(&store, odd, "setValue", true);
    assert!(find_bridged_method(&store, &bridge).is_none());
}

#[test]
fn test_candidates_with_one_signature_pick_the_first() {
    let store = ClassStore::new();
    let types = store.types();

    let top = store.register(ClassInfo::class("Top").with_method(MethodInfo::setter("setCount", TypeId::INT)));
    let bottom = store.register(
        ClassInfo::class("Bottom")
            .with_superclass(types.class(top))
            .with_method(MethodInfo::setter("setCount", TypeId::INT))
            .with_method(MethodInfo::setter("setCount", TypeId::OBJECT).synthetic()),
    );
    let bridge = method(&store, bottom, "setCount", true);

    let bridged = find_bridged_method(&store, &bridge).expect("bridged method");
    assert_eq!(bridged.declaring, bottom);
}

#[test]
fn test_array_parameter_matches_substituted_component() {
    let store = ClassStore::new();
    let types = store.types();

    // class ArrHolder<T> { void setItems(T[]) }
    // class StrArr extends ArrHolder<String> {
    //     setItems(long); setItems(String[]); bridge setItems(Object[])
    // }
    let holder = store.reserve("ArrHolder");
    let t = types.type_param(holder, 0, "T");
    store.define(
        holder,
        ClassInfo::class("ArrHolder")
            .with_type_params(vec![TypeParamDecl::new(t)])
            .with_method(MethodInfo::setter("setItems", types.array(t))),
    );
    let str_arr = store.register(
        ClassInfo::class("StrArr")
            .with_superclass(types.parameterized(holder, [TypeId::STRING]))
            .with_method(MethodInfo::setter("setItems", TypeId::LONG))
            .with_method(MethodInfo::setter("setItems", types.array(TypeId::STRING)))
            .with_method(MethodInfo::setter("setItems", types.array(TypeId::OBJECT)).synthetic()),
    );
    let bridge = method(&store, str_arr, "setItems", true);

    let bridged = find_bridged_method(&store, &bridge).expect("bridged method");
    assert_eq!(bridged.declaring, str_arr);
    assert_eq!(bridged.params.as_slice(), &[types.array(TypeId::STRING)]);
}
