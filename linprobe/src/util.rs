/// Implements `next` and `size_hint` for iterators that walk a slot array and yield only occupied
/// slots.
///
/// The iterator struct needs an `inner` slot iterator and a `remaining` count of occupied slots not
/// yet yielded.
macro_rules! impl_slot_iterator {
    ($occupied:pat => $f:expr) => {
        fn next(&mut self) -> Option<Self::Item> {
            for slot in self.inner.by_ref() {
                if let $occupied = slot {
                    self.remaining -= 1;
                    return Some($f);
                }
            }
            None
        }
        fn size_hint(&self) -> (usize, Option<usize>) {
            (self.remaining, Some(self.remaining))
        }
    };
}
pub(crate) use impl_slot_iterator;
