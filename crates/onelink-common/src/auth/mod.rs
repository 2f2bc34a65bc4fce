//! Authentication utilities

mod jwt;
mod password;

pub use jwt::{Claims, JwtService, TokenPair, TokenType};
pub use password::{
    check_new_password, hash_password, verify_password, PasswordService, MIN_PASSWORD_LENGTH,
};
