pub mod char_to_key_name;
pub mod key_name_to_keysym;

pub use char_to_key_name::CharToKeyName;
pub use key_name_to_keysym::KeyNameToKeysym;
