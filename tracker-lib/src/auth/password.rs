use argon2::Config;

pub fn encode_password(password: &str) -> Result<String, argon2::Error> {
    let config = Config::default();
    let salt: [u8; 32] = rand::random();
    let password_hash = argon2::hash_encoded(password.as_bytes(), &salt, &config)?;
    Ok(password_hash)
}

/// A digest that cannot be parsed fails verification instead of erroring.
pub fn verify_password(password: &str, password_hash: &str) -> bool {
    argon2::verify_encoded(password_hash, password.as_bytes()).unwrap_or(false)
}
