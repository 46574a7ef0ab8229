use crc32fast::Hasher;

/// Generate a document id from a document key (path or page slug) using CRC32
pub fn get_document_id(key: &str) -> String {
    let mut buff = String::from(key);
    if !key.starts_with("page://") {
        buff = format!("page://{}", buff);
    }

    let mut hasher = Hasher::new();
    hasher.update(buff.as_bytes());
    format!("{:x}", hasher.finalize())
}

/// Sequential id generator for nodes within a document
#[derive(Debug, Clone)]
pub struct IdGenerator {
    seed: String,
    count: u32,
}

impl IdGenerator {
    pub fn new(document_key: &str) -> Self {
        Self {
            seed: get_document_id(document_key),
            count: 0,
        }
    }

    pub fn from_seed(seed: impl Into<String>) -> Self {
        Self {
            seed: seed.into(),
            count: 0,
        }
    }

    /// Generate next sequential id
    pub fn new_id(&mut self) -> String {
        self.count += 1;
        format!("{}-{}", self.seed, self.count)
    }

    /// Generate the next id for which `taken` returns false.
    ///
    /// Documents loaded from storage may already contain ids minted by an
    /// earlier generator with the same seed, so callers pass a membership
    /// test for the tree they are about to insert into.
    pub fn fresh_id(&mut self, taken: impl Fn(&str) -> bool) -> String {
        loop {
            let id = self.new_id();
            if !taken(&id) {
                return id;
            }
        }
    }

    /// Get document id seed
    pub fn seed(&self) -> &str {
        &self.seed
    }
}

impl Default for IdGenerator {
    fn default() -> Self {
        Self::new("untitled")
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_document_id_generation() {
        let id1 = get_document_id("/home");
        let id2 = get_document_id("/home");
        assert_eq!(id1, id2);

        let id3 = get_document_id("/pricing");
        assert_ne!(id1, id3);
    }

    #[test]
    fn test_sequential_ids() {
        let mut gen = IdGenerator::new("/home");

        let id1 = gen.new_id();
        let id2 = gen.new_id();

        assert!(id1.ends_with("-1"));
        assert!(id2.ends_with("-2"));
        assert!(id1.starts_with(gen.seed()));
    }

    #[test]
    fn test_fresh_id_skips_taken() {
        let mut gen = IdGenerator::from_seed("p");
        let id = gen.fresh_id(|candidate| candidate == "p-1" || candidate == "p-2");
        assert_eq!(id, "p-3");
    }
}
