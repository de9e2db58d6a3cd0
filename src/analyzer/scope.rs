use std::collections::HashSet;

/// Lexical scopes layered by block nesting; the outermost frame is global.
#[derive(Debug)]
pub(super) struct ScopeChain {
    frames: Vec<HashSet<String>>,
    /// Names declared in a header `( ... )`, owned by the block that follows.
    staged: Vec<String>,
    /// Names whose declaring block has been closed.
    retired: HashSet<String>,
}

impl ScopeChain {
    pub fn new() -> Self {
        Self {
            frames: vec![HashSet::new()],
            staged: vec![],
            retired: HashSet::new(),
        }
    }

    pub fn push(&mut self) {
        let frame = self.staged.drain(..).collect();
        self.frames.push(frame);
    }

    pub fn pop(&mut self) {
        if self.frames.len() > 1 {
            if let Some(frame) = self.frames.pop() {
                self.retired.extend(frame);
            }
        }
    }

    pub fn declare(&mut self, name: &str) {
        if let Some(frame) = self.frames.last_mut() {
            frame.insert(name.to_string());
        }
    }

    pub fn stage(&mut self, name: &str) {
        self.staged.push(name.to_string());
    }

    /// Moves staged names into the current frame when no block claimed them.
    pub fn flush_staged(&mut self) {
        let staged: Vec<_> = self.staged.drain(..).collect();
        for name in staged {
            self.declare(&name);
        }
    }

    pub fn is_visible(&self, name: &str) -> bool {
        self.staged.iter().any(|s| s == name) || self.frames.iter().rev().any(|f| f.contains(name))
    }

    /// A name is out of scope when its block has closed and no enclosing
    /// frame declares it. Names declared further down are not reported.
    pub fn is_out_of_scope(&self, name: &str) -> bool {
        self.retired.contains(name) && !self.is_visible(name)
    }
}
