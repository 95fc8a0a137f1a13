/// Returns the indices `0..len` in the order that, when the elements of a sorted slice are
/// inserted into an empty BST one by one, produces a tree of minimal height.
///
/// Each slice contributes its middle element first and then the middles of its left and right
/// halves, i.e. a preorder walk of the balanced shape.
pub(crate) fn median_order(len: usize) -> Vec<usize> {
    let mut order = Vec::with_capacity(len);
    push_medians(0, len, &mut order);
    order
}

/// Recursive helper for [`median_order`]. Recursion depth is `lg(hi - lo)`.
fn push_medians(lo: usize, hi: usize, order: &mut Vec<usize>) {
    if lo < hi {
        let mid = lo + (hi - lo) / 2;
        order.push(mid);
        push_medians(lo, mid, order);
        push_medians(mid + 1, hi, order);
    }
}
