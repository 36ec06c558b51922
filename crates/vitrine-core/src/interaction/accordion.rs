/// At most one item open at a time.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Accordion {
    len: usize,
    open: Option<usize>,
}

impl Accordion {
    /// `initially_open` outside `0..len` is ignored.
    pub fn new(len: usize, initially_open: Option<usize>) -> Self {
        Self {
            len,
            open: initially_open.filter(|i| *i < len),
        }
    }

    /// FAQ list: first question expanded.
    pub fn faq(len: usize) -> Self {
        Self::new(len, Some(0))
    }

    /// Course modules: everything collapsed.
    pub fn courses(len: usize) -> Self {
        Self::new(len, None)
    }

    pub fn open_index(&self) -> Option<usize> {
        self.open
    }

    pub fn is_open(&self, index: usize) -> bool {
        self.open == Some(index)
    }

    /// Opens `index`, or closes it when it is already open.
    pub fn toggle(&mut self, index: usize) {
        if index >= self.len {
            return;
        }
        self.open = if self.open == Some(index) { None } else { Some(index) };
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn faq_starts_with_first_open() {
        let a = Accordion::faq(5);
        assert!(a.is_open(0));
    }

    #[test]
    fn toggle_switches_and_closes() {
        let mut a = Accordion::courses(3);
        assert_eq!(a.open_index(), None);
        a.toggle(1);
        assert!(a.is_open(1));
        a.toggle(2);
        assert!(a.is_open(2) && !a.is_open(1));
        a.toggle(2);
        assert_eq!(a.open_index(), None);
        a.toggle(7);
        assert_eq!(a.open_index(), None);
    }
}
