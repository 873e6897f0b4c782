use rand::Rng;

/// Random 32-character lowercase hex identifier: MD5 of a random float's text.
pub fn unique_hash<R: Rng + ?Sized>(rng: &mut R) -> String {
    let seed: f64 = rng.random();
    format!("{:x}", md5::compute(seed.to_string()))
}
