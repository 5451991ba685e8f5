//! Strongly typed identifier wrappers.
//!
//! Index ids (`AgentId`, `NodeId`) address SoA storage directly and default to
//! an `INVALID` sentinel.  Class ids (`AgentType`, `AreaId`) label groups of
//! agents or nodes; their zero value means "unrestricted".

use std::fmt;

/// Generate a typed index wrapper around a primitive integer.
macro_rules! typed_id {
    ($(#[$attr:meta])* $vis:vis struct $name:ident($inner:ty);) => {
        $(#[$attr])*
        #[derive(Copy, Clone, PartialEq, Eq, Hash, PartialOrd, Ord, Debug)]
        #[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
        $vis struct $name(pub $inner);

        impl $name {
            /// Sentinel meaning "no valid ID".
            pub const INVALID: $name = $name(<$inner>::MAX);

            /// Cast to `usize` for direct use as a `Vec` index.
            #[inline(always)]
            pub fn index(self) -> usize {
                self.0 as usize
            }
        }

        impl Default for $name {
            #[inline(always)]
            fn default() -> Self {
                Self::INVALID
            }
        }

        impl fmt::Display for $name {
            fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
                write!(f, "{}({})", stringify!($name), self.0)
            }
        }

        impl From<$name> for usize {
            #[inline(always)]
            fn from(id: $name) -> usize {
                id.0 as usize
            }
        }

        impl TryFrom<usize> for $name {
            type Error = std::num::TryFromIntError;
            fn try_from(n: usize) -> Result<$name, Self::Error> {
                <$inner>::try_from(n).map($name)
            }
        }
    };
}

/// Generate a class label wrapper whose zero value is the wildcard.
macro_rules! class_id {
    ($(#[$attr:meta])* $vis:vis struct $name:ident($inner:ty);) => {
        $(#[$attr])*
        #[derive(Copy, Clone, PartialEq, Eq, Hash, PartialOrd, Ord, Debug, Default)]
        #[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
        #[cfg_attr(feature = "serde", serde(transparent))]
        $vis struct $name(pub $inner);

        impl $name {
            /// The wildcard class: compatible with every other class.
            pub const UNRESTRICTED: $name = $name(0);

            #[inline(always)]
            pub fn is_unrestricted(self) -> bool {
                self.0 == 0
            }
        }

        impl fmt::Display for $name {
            fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
                write!(f, "{}", self.0)
            }
        }
    };
}

typed_id! {
    /// Index of an agent (car) in SoA storage.
    pub struct AgentId(u32);
}

typed_id! {
    /// Index of a road-network node.
    pub struct NodeId(u32);
}

class_id! {
    /// Agent category.  Type 0 is compatible with every type for contact
    /// eligibility and roams the whole road network.
    pub struct AgentType(u16);
}

class_id! {
    /// Road-network area label.  Area 0 means the full, unrestricted graph.
    pub struct AreaId(u16);
}

impl AgentType {
    /// Whether two agents of these types may exchange artifacts when type
    /// restriction is active: same type, or either one is type 0.
    #[inline]
    pub fn compatible(self, other: AgentType) -> bool {
        self == other || self.is_unrestricted() || other.is_unrestricted()
    }

    /// The area an agent of this type is confined to under area restriction.
    #[inline]
    pub fn home_area(self) -> AreaId {
        AreaId(self.0)
    }
}
