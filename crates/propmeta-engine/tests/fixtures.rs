//! A small registered class library shared by the engine tests.
//!
//! ```text
//! interface Collection<E>
//! interface List<E> extends Collection<E>
//! interface Supplier<S>                      { S getSupplied() }
//! class Number
//! class Address                              { String street (rw, @Column) }
//! class Box<T>                               { T value (rw) }
//! class StringBox extends Box<String>
//! class Person                               { String name (rw), long id (ro),
//!                                              Collection<Address> addresses,
//!                                              Collection tags, boolean active,
//!                                              List<List<String>> matrix }
//! class Employee extends Person              { String id (ro, shadows long id) }
//! class Manager extends Employee
//! class Base<T>                              { T payload }
//! class Mid<U> extends Base<U>               { List<U> history }
//! class Leaf extends Mid<String>
//! class Holder<T>                            { T item }
//! class StringHolder extends Holder<String>  { bridge Object getItem(), String getItem() }
//! class PlainStringHolder extends Holder<String>
//! class Repo<E>; class Repo.Cursor           { E current }
//! class AddressRepo extends Repo<Address>; class AddressRepo.AddressCursor extends Repo.Cursor
//! class Outer<T>; class Outer.Inner<V>       { T left, V right }
//! class Concrete extends Outer<String>.Inner<Integer>
//! class Sorted<N extends Number>             { N first }
//! class AddressList implements List<Address>
//! class AddressSupplier implements Supplier<Address>
//! ```

use crate::accessor::{read_with, write_with};
use crate::def::{Annotation, ClassInfo, ClassStore, DefId, FieldInfo, MethodInfo};
use crate::types::{TypeId, TypeParamDecl};
use std::sync::Arc;

/// Instance type backing the `Person` accessors.
#[derive(Clone, Debug, Default, PartialEq)]
pub struct PersonValue {
    pub name: String,
    pub id: i64,
    pub active: bool,
}

/// Instance type backing the `StringBox` accessors.
#[derive(Clone, Debug, Default, PartialEq)]
pub struct StringBoxValue {
    pub value: String,
}

pub struct Fixture {
    pub store: Arc<ClassStore>,

    pub collection: DefId,
    pub list: DefId,
    pub supplier: DefId,
    pub number: DefId,
    pub address: DefId,
    pub boxed: DefId,
    pub box_t: TypeId,
    pub string_box: DefId,
    pub person: DefId,
    pub employee: DefId,
    pub manager: DefId,
    pub base: DefId,
    pub base_t: TypeId,
    pub mid: DefId,
    pub mid_u: TypeId,
    pub leaf: DefId,
    pub holder: DefId,
    pub holder_t: TypeId,
    pub string_holder: DefId,
    pub plain_string_holder: DefId,
    pub repo: DefId,
    pub repo_e: TypeId,
    pub cursor: DefId,
    pub address_repo: DefId,
    pub address_cursor: DefId,
    pub outer: DefId,
    pub outer_t: TypeId,
    pub inner: DefId,
    pub inner_v: TypeId,
    pub concrete: DefId,
    pub sorted: DefId,
    pub sorted_n: TypeId,
    pub address_list: DefId,
    pub address_supplier: DefId,
    pub collection_e: TypeId,
    pub list_e: TypeId,
    pub supplier_s: TypeId,
}

impl Fixture {
    pub fn class_type(&self, def: DefId) -> TypeId {
        self.store.types().class(def)
    }
}

pub fn library() -> Fixture {
    let store = Arc::new(ClassStore::new());
    let types = store.types();

    // Collections
    let collection = store.reserve("Collection");
    let collection_e = types.type_param(collection, 0, "E");
    store.define(
        collection,
        ClassInfo::interface("Collection").with_type_params(vec![TypeParamDecl::new(collection_e)]),
    );

    let list = store.reserve("List");
    let list_e = types.type_param(list, 0, "E");
    store.define(
        list,
        ClassInfo::interface("List")
            .with_type_params(vec![TypeParamDecl::new(list_e)])
            .with_interfaces(vec![types.parameterized(collection, [list_e])]),
    );

    let supplier = store.reserve("Supplier");
    let supplier_s = types.type_param(supplier, 0, "S");
    store.define(
        supplier,
        ClassInfo::interface("Supplier")
            .with_type_params(vec![TypeParamDecl::new(supplier_s)])
            .with_method(MethodInfo::getter("getSupplied", supplier_s)),
    );

    let number = store.register(ClassInfo::class("Number"));

    let address = store.register(
        ClassInfo::class("Address")
            .with_method(MethodInfo::getter("getStreet", TypeId::STRING))
            .with_method(MethodInfo::setter("setStreet", TypeId::STRING))
            .with_field(
                FieldInfo::new("street", TypeId::STRING)
                    .with_annotation(Annotation::new("Column").with_value("name", "STREET")),
            ),
    );
    let address_ty = types.class(address);

    // Box<T> / StringBox
    let boxed = store.reserve("Box");
    let box_t = types.type_param(boxed, 0, "T");
    store.define(
        boxed,
        ClassInfo::class("Box")
            .with_type_params(vec![TypeParamDecl::new(box_t)])
            .with_method(
                MethodInfo::getter("getValue", box_t)
                    .with_body(read_with(|b: &StringBoxValue| b.value.clone())),
            )
            .with_method(
                MethodInfo::setter("setValue", box_t)
                    .with_body(write_with(|b: &mut StringBoxValue, v: String| b.value = v)),
            )
            .with_field(FieldInfo::new("value", box_t)),
    );
    let string_box = store.register(
        ClassInfo::class("StringBox").with_superclass(types.parameterized(boxed, [TypeId::STRING])),
    );

    // Person hierarchy
    let person = store.register(
        ClassInfo::class("Person")
            .with_method(
                MethodInfo::getter("getName", TypeId::STRING)
                    .with_body(read_with(|p: &PersonValue| p.name.clone())),
            )
            .with_method(
                MethodInfo::setter("setName", TypeId::STRING)
                    .with_body(write_with(|p: &mut PersonValue, v: String| p.name = v)),
            )
            .with_method(
                MethodInfo::getter("getId", TypeId::LONG)
                    .with_body(read_with(|p: &PersonValue| p.id)),
            )
            .with_method(MethodInfo::getter(
                "getAddresses",
                types.parameterized(collection, [address_ty]),
            ))
            .with_method(MethodInfo::getter("getTags", types.class(collection)))
            .with_method(
                MethodInfo::getter("isActive", TypeId::BOOLEAN)
                    .with_body(read_with(|p: &PersonValue| p.active)),
            )
            .with_method(MethodInfo::setter("setActive", TypeId::BOOLEAN))
            .with_method(MethodInfo::getter(
                "getMatrix",
                types.parameterized(list, [types.parameterized(list, [TypeId::STRING])]),
            ))
            .with_method(MethodInfo::setter("setOrphan", TypeId::INT))
            .with_field(
                FieldInfo::new("name", TypeId::STRING)
                    .with_annotation(Annotation::new("NotNull")),
            ),
    );
    let employee = store.register(
        ClassInfo::class("Employee")
            .with_superclass(types.class(person))
            .with_method(MethodInfo::getter("getId", TypeId::STRING)),
    );
    let manager = store.register(ClassInfo::class("Manager").with_superclass(types.class(employee)));

    // Base<T> / Mid<U> / Leaf
    let base = store.reserve("Base");
    let base_t = types.type_param(base, 0, "T");
    store.define(
        base,
        ClassInfo::class("Base")
            .with_type_params(vec![TypeParamDecl::new(base_t)])
            .with_method(MethodInfo::getter("getPayload", base_t)),
    );
    let mid = store.reserve("Mid");
    let mid_u = types.type_param(mid, 0, "U");
    store.define(
        mid,
        ClassInfo::class("Mid")
            .with_type_params(vec![TypeParamDecl::new(mid_u)])
            .with_superclass(types.parameterized(base, [mid_u]))
            .with_method(MethodInfo::getter(
                "getHistory",
                types.parameterized(list, [mid_u]),
            )),
    );
    let leaf = store.register(
        ClassInfo::class("Leaf").with_superclass(types.parameterized(mid, [TypeId::STRING])),
    );

    // Holder<T> with a bridged override
    let holder = store.reserve("Holder");
    let holder_t = types.type_param(holder, 0, "T");
    store.define(
        holder,
        ClassInfo::class("Holder")
            .with_type_params(vec![TypeParamDecl::new(holder_t)])
            .with_method(MethodInfo::getter("getItem", holder_t))
            .with_method(MethodInfo::setter("setItem", holder_t)),
    );
    let holder_string = types.parameterized(holder, [TypeId::STRING]);
    let string_holder = store.register(
        ClassInfo::class("StringHolder")
            .with_superclass(holder_string)
            .with_method(MethodInfo::getter("getItem", TypeId::OBJECT).synthetic())
            .with_method(
                MethodInfo::getter("getItem", TypeId::STRING)
                    .with_body(read_with(|b: &StringBoxValue| b.value.clone())),
            )
            .with_method(MethodInfo::setter("setItem", TypeId::OBJECT).synthetic())
            .with_method(MethodInfo::setter("setItem", TypeId::STRING)),
    );
    let plain_string_holder =
        store.register(ClassInfo::class("PlainStringHolder").with_superclass(holder_string));

    // Repo<E> / Repo.Cursor / AddressRepo / AddressRepo.AddressCursor
    let repo = store.reserve("Repo");
    let repo_e = types.type_param(repo, 0, "E");
    store.define(
        repo,
        ClassInfo::class("Repo").with_type_params(vec![TypeParamDecl::new(repo_e)]),
    );
    let cursor = store.register(
        ClassInfo::class("Repo.Cursor")
            .with_enclosing(repo)
            .with_method(MethodInfo::getter("getCurrent", repo_e)),
    );
    let address_repo = store.register(
        ClassInfo::class("AddressRepo").with_superclass(types.parameterized(repo, [address_ty])),
    );
    let address_cursor = store.register(
        ClassInfo::class("AddressRepo.AddressCursor")
            .with_enclosing(address_repo)
            .with_superclass(types.class(cursor)),
    );

    // Outer<T> / Outer.Inner<V> / Concrete
    let outer = store.reserve("Outer");
    let outer_t = types.type_param(outer, 0, "T");
    store.define(
        outer,
        ClassInfo::class("Outer").with_type_params(vec![TypeParamDecl::new(outer_t)]),
    );
    let inner = store.reserve("Outer.Inner");
    let inner_v = types.type_param(inner, 0, "V");
    store.define(
        inner,
        ClassInfo::class("Outer.Inner")
            .with_enclosing(outer)
            .with_type_params(vec![TypeParamDecl::new(inner_v)])
            .with_method(MethodInfo::getter("getLeft", outer_t))
            .with_method(MethodInfo::getter("getRight", inner_v)),
    );
    let outer_string = types.parameterized(outer, [TypeId::STRING]);
    let concrete = store.register(
        ClassInfo::class("Concrete")
            .with_superclass(types.nested_parameterized(outer_string, inner, [TypeId::INT])),
    );

    // Sorted<N extends Number>
    let sorted = store.reserve("Sorted");
    let sorted_n = types.type_param(sorted, 0, "N");
    store.define(
        sorted,
        ClassInfo::class("Sorted")
            .with_type_params(vec![TypeParamDecl::bounded(sorted_n, types.class(number))])
            .with_method(MethodInfo::getter("getFirst", sorted_n)),
    );

    // Interface implementations
    let address_list = store.register(
        ClassInfo::class("AddressList")
            .with_interfaces(vec![types.parameterized(list, [address_ty])]),
    );
    let address_supplier = store.register(
        ClassInfo::class("AddressSupplier")
            .with_interfaces(vec![types.parameterized(supplier, [address_ty])]),
    );

    Fixture {
        store,
        collection,
        list,
        supplier,
        number,
        address,
        boxed,
        box_t,
        string_box,
        person,
        employee,
        manager,
        base,
        base_t,
        mid,
        mid_u,
        leaf,
        holder,
        holder_t,
        string_holder,
        plain_string_holder,
        repo,
        repo_e,
        cursor,
        address_repo,
        address_cursor,
        outer,
        outer_t,
        inner,
        inner_v,
        concrete,
        sorted,
        sorted_n,
        address_list,
        address_supplier,
        collection_e,
        list_e,
        supplier_s,
    }
}
