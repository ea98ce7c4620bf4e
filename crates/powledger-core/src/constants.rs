pub const HASH_SIZE: usize = 32;
pub const HASH_HEX_SIZE: usize = HASH_SIZE * 2;
/// Placeholder hash carried by the genesis block. It is not a digest.
pub const GENESIS_HASH: &str = "0";
pub const GENESIS_PREVIOUS_HASH: &str = "";
pub const DEFAULT_DIFFICULTY: usize = 2;
