use std::{
    any::{type_name, TypeId},
    path::PathBuf,
    time::Duration,
};

use shared::{
    domain::{FaultCategory, MenuSelection},
    error::{Fault, Outcome},
};

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct LoadedType {
    pub name: &'static str,
    /// Java name accepted for the same type, e.g. `java.lang.String`.
    pub alias: Option<&'static str>,
    pub id: TypeId,
}

macro_rules! loaded_types {
    (@alias $alias:literal) => {
        Some($alias)
    };
    (@alias) => {
        None
    };
    ($($ty:ty $(=> $alias:literal)?),* $(,)?) => {
        vec![$(LoadedType {
            name: type_name::<$ty>(),
            alias: loaded_types!(@alias $($alias)?),
            id: TypeId::of::<$ty>(),
        }),*]
    };
}

/// Types that can be looked up by name at runtime.
#[derive(Debug, Clone)]
pub struct TypeRegistry {
    types: Vec<LoadedType>,
}

impl TypeRegistry {
    pub fn builtin() -> Self {
        Self {
            types: loaded_types![
                bool => "java.lang.Boolean",
                char => "java.lang.Character",
                i8 => "java.lang.Byte",
                i16 => "java.lang.Short",
                i32 => "java.lang.Integer",
                i64 => "java.lang.Long",
                u8,
                u16,
                u32,
                u64,
                f32 => "java.lang.Float",
                f64 => "java.lang.Double",
                usize,
                String => "java.lang.String",
                PathBuf => "java.io.File",
                Duration => "java.time.Duration",
                FaultCategory,
                MenuSelection,
                Fault,
                Outcome,
            ],
        }
    }

    /// Matches the full type path, its last segment or the Java alias,
    /// case-sensitively.
    pub fn resolve(&self, name: &str) -> Option<LoadedType> {
        self.types.iter().copied().find(|loaded| {
            loaded.name == name || short_name(loaded.name) == name || loaded.alias == Some(name)
        })
    }
}

impl Default for TypeRegistry {
    fn default() -> Self {
        Self::builtin()
    }
}

fn short_name(full: &str) -> &str {
    full.rsplit("::").next().unwrap_or(full)
}
