//! # Pagecraft Evaluator
//!
//! Read-only resolvers consumed by the renderer:
//!
//! - [`cascade`]: breakpoint/state style cascade plus variable bindings
//! - [`binding`]: declarative CMS query → block props projection
//! - [`instancing`]: component instance expansion with override addressing
//! - [`evaluator`]: the above applied to a whole page
//!
//! None of these fail on stale or unknown references; they fall back to the
//! node's authored content.

pub mod binding;
pub mod cascade;
pub mod collection;
pub mod errors;
pub mod evaluator;
pub mod instancing;

pub use binding::{
    bind_page, bind_props, resolve_binding, BindingMode, BindingSpec, BlockCatalog, BoundRecord,
    DefaultCatalog, MappedCatalog, Pagination, PaginationMode, Query, SortDirection, SortSpec,
    BINDING_KEY,
};
pub use cascade::{resolve_all_states, resolve_styles, ResolvedStyles};
pub use collection::{Collection, CollectionSet, FieldDef, Item};
pub use errors::{EvalError, EvalResult};
pub use evaluator::{Evaluator, ResolvedNode};
pub use instancing::{
    instance_node, is_instance, ComponentDef, ComponentLibrary, ComponentVariant,
    InstanceResolver, COMPONENT_INSTANCE_TYPE,
};
