// src/form/products.rs

/// Stable identity of a product block. Keys come from a per-session counter
/// and are never reused, so they say nothing about display order.
pub type BlockKey = u64;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ProductBlock {
    pub key: BlockKey,
}

/// Ordered list of product blocks. The list is never empty.
#[derive(Debug, Clone)]
pub struct ProductBlocks {
    blocks: Vec<ProductBlock>,
    next_key: BlockKey,
}

impl Default for ProductBlocks {
    fn default() -> Self {
        Self::new()
    }
}

impl ProductBlocks {
    /// Starts with the single block the builder page always shows.
    pub fn new() -> Self {
        Self {
            blocks: vec![ProductBlock { key: 1 }],
            next_key: 2,
        }
    }

    /// Appends a fresh block and returns its key.
    pub fn add(&mut self) -> BlockKey {
        let key = self.next_key;
        self.next_key += 1;
        self.blocks.push(ProductBlock { key });
        key
    }

    /// Removes the block with `key`. Refused (returns `None`) when it is the
    /// last remaining block or the key is unknown.
    pub fn remove(&mut self, key: BlockKey) -> Option<ProductBlock> {
        if self.blocks.len() <= 1 {
            return None;
        }
        let index = self.position(key)?;
        Some(self.blocks.remove(index))
    }

    pub fn len(&self) -> usize {
        self.blocks.len()
    }

    pub fn position(&self, key: BlockKey) -> Option<usize> {
        self.blocks.iter().position(|b| b.key == key)
    }

    pub fn get(&self, key: BlockKey) -> Option<&ProductBlock> {
        self.blocks.iter().find(|b| b.key == key)
    }

    pub fn iter(&self) -> impl Iterator<Item = &ProductBlock> {
        self.blocks.iter()
    }

    /// Remove controls are shown only while more than one block exists.
    pub fn remove_visible(&self) -> bool {
        self.blocks.len() > 1
    }

    /// Display label for `key`, derived from its current position.
    pub fn label_of(&self, key: BlockKey) -> Option<String> {
        self.position(key).map(label_for_index)
    }
}

pub fn label_for_index(index: usize) -> String {
    format!("Product {}", index + 1)
}

#[cfg(test)]
impl ProductBlocks {
    /// Labels in document order: "Product 1" .. "Product N".
    pub fn labels(&self) -> Vec<String> {
        (0..self.blocks.len()).map(label_for_index).collect()
    }
}
