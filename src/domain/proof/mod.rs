// 証明木の役割モデル

pub mod roles;

pub use roles::{child_roles, RoleMask};
