use arch::Word;
use num_enum::IntoPrimitive;

/// Outcome of the last push or pop, as read by `stackc`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, IntoPrimitive)]
#[repr(i32)]
pub enum Status {
    #[default]
    Ok = 0,
    Full = 1,
    Empty = 2,
}

/// Bounded LIFO. Overflow and underflow are not errors: they leave the
/// stack unchanged and record the status.
#[derive(Debug, Clone)]
pub struct Stack {
    items: Vec<Word>,
    capacity: usize,
    status: Status,
}

impl Stack {
    pub fn new(capacity: usize) -> Self {
        Stack {
            items: Vec::with_capacity(capacity),
            capacity,
            status: Status::Ok,
        }
    }

    pub fn push(&mut self, val: Word) {
        if self.items.len() >= self.capacity {
            self.status = Status::Full;
        } else {
            self.items.push(val);
            self.status = Status::Ok;
        }
    }

    /// Popping an empty stack yields 0.
    pub fn pop(&mut self) -> Word {
        match self.items.pop() {
            Some(val) => {
                self.status = Status::Ok;
                val
            }
            None => {
                self.status = Status::Empty;
                0
            }
        }
    }

    pub fn status(&self) -> Status {
        self.status
    }

    pub fn clear(&mut self) {
        self.items.clear();
        self.status = Status::Ok;
    }

    pub fn len(&self) -> usize {
        self.items.len()
    }

    pub fn is_empty(&self) -> bool {
        self.items.is_empty()
    }

    pub fn top(&self) -> Option<Word> {
        self.items.last().copied()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn full_push_is_dropped() {
        let mut stack = Stack::new(2);
        stack.push(1);
        stack.push(2);
        assert_eq!(stack.status(), Status::Ok);
        stack.push(3);
        assert_eq!(stack.status(), Status::Full);
        assert_eq!(stack.len(), 2);
        assert_eq!(stack.top(), Some(2));
        assert_eq!(i32::from(Status::Full), 1);
    }

    #[test]
    fn empty_pop_is_zero() {
        let mut stack = Stack::new(2);
        assert_eq!(stack.pop(), 0);
        assert_eq!(stack.status(), Status::Empty);
        assert_eq!(i32::from(stack.status()), 2);
    }

    #[test]
    fn balanced_restores() {
        let mut stack = Stack::new(4);
        stack.push(9);
        stack.pop();
        stack.pop();
        assert_eq!(stack.status(), Status::Empty);
        stack.push(7);
        stack.push(8);
        assert_eq!(stack.pop(), 8);
        assert_eq!(stack.status(), Status::Ok);
        assert_eq!(stack.top(), Some(7));
    }
}
