//! Status enums mapping to SMALLINT lookup tables.
//!
//! Each enum variant's discriminant matches the seed data order (1-based)
//! in the corresponding `*_statuses` database table. The wire name is the
//! one the storefront displays.

use serde::{Deserialize, Serialize};

use crate::error::CoreError;

/// Status ID type matching SMALLINT in the database.
pub type StatusId = i16;

macro_rules! define_status_enum {
    (
        $(#[$meta:meta])*
        $name:ident {
            $( $(#[$vmeta:meta])* $variant:ident = $val:literal => $label:literal ),+ $(,)?
        }
    ) => {
        $(#[$meta])*
        #[repr(i16)]
        #[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
        pub enum $name {
            $( $(#[$vmeta])* #[serde(rename = $label)] $variant = $val ),+
        }

        impl $name {
            pub const ALL: &'static [$name] = &[$($name::$variant),+];

            /// Return the database status ID.
            pub fn id(self) -> StatusId {
                self as StatusId
            }

            /// Return the display / wire name.
            pub fn name(self) -> &'static str {
                match self {
                    $( $name::$variant => $label ),+
                }
            }

            pub fn from_id(id: StatusId) -> Result<Self, CoreError> {
                match id {
                    $( $val => Ok($name::$variant), )+
                    other => Err(CoreError::Validation(format!(
                        concat!("Unknown ", stringify!($name), " id {}"),
                        other
                    ))),
                }
            }

            pub fn from_name(name: &str) -> Result<Self, CoreError> {
                Self::ALL
                    .iter()
                    .copied()
                    .find(|s| s.name().eq_ignore_ascii_case(name))
                    .ok_or_else(|| CoreError::Validation(format!(
                        concat!("Unknown ", stringify!($name), " '{}'"),
                        name
                    )))
            }
        }

        impl From<$name> for StatusId {
            fn from(value: $name) -> Self {
                value as StatusId
            }
        }

        impl std::fmt::Display for $name {
            fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
                f.write_str(self.name())
            }
        }
    };
}

define_status_enum! {
    /// Store lifecycle status.
    StoreStatus {
        /// Created but not yet open to customers.
        Draft = 1 => "Borrador",
        Active = 2 => "Activa",
        /// Closed by the platform operator.
        Suspended = 3 => "Suspendida",
        /// Closed for good (the store was deleted).
        Inactive = 4 => "Inactiva",
    }
}

define_status_enum! {
    /// Order fulfillment status.
    OrderStatus {
        Pending = 1 => "Pendiente",
        Processing = 2 => "Procesando",
        Shipped = 3 => "Enviado",
        Delivered = 4 => "Entregado",
        Cancelled = 5 => "Cancelado",
        Paid = 6 => "Pagado",
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn ids_round_trip() {
        for status in OrderStatus::ALL {
            assert_eq!(OrderStatus::from_id(status.id()).unwrap(), *status);
        }
        for status in StoreStatus::ALL {
            assert_eq!(StoreStatus::from_id(status.id()).unwrap(), *status);
        }
    }

    #[test]
    fn unknown_id_is_rejected() {
        assert!(OrderStatus::from_id(0).is_err());
        assert!(StoreStatus::from_id(5).is_err());
    }

    #[test]
    fn names_parse_case_insensitively() {
        assert_eq!(OrderStatus::from_name("pagado").unwrap(), OrderStatus::Paid);
        assert_eq!(StoreStatus::from_name("Activa").unwrap(), StoreStatus::Active);
        assert!(OrderStatus::from_name("Shipped").is_err());
    }

    #[test]
    fn serializes_with_display_name() {
        let json = serde_json::to_value(OrderStatus::Shipped).unwrap();
        assert_eq!(json, "Enviado");
        let parsed: StoreStatus = serde_json::from_value(serde_json::json!("Suspendida")).unwrap();
        assert_eq!(parsed, StoreStatus::Suspended);
    }
}
