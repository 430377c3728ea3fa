use crate::Primitive;

pub(crate) fn div_roundup(val: usize, divisor: usize) -> usize {
    if val % divisor != 0 {
        val / divisor + 1
    } else {
        val / divisor
    }
}

/// Elementwise `dst += src`
#[inline(always)]
pub(crate) fn add_assign_slice<T: Primitive>(dst: &mut [T], src: &[T]) {
    debug_assert_eq!(dst.len(), src.len());
    dst.iter_mut().zip(src.iter()).for_each(|(d, s)| *d += s);
}

#[inline(always)]
pub(crate) fn add_assign_counts(dst: &mut [u64], src: &[u64]) {
    debug_assert_eq!(dst.len(), src.len());
    dst.iter_mut().zip(src.iter()).for_each(|(d, s)| *d += *s);
}

#[cfg(test)]
macro_rules! assert_approx_eq {
	($left: expr, $right: expr, $tol: expr) => ({
		match ($left, $right, $tol) {
			(left_val , right_val, tol_val) => {
				let delta = (left_val - right_val).abs();
				if !(delta < tol_val) {
					panic!(
						"assertion failed: `(left ≈ right)` \
						(left: `{}`, right: `{}`) \
						with ∆={:1.1e} (allowed ∆={:e})",
						left_val , right_val, delta, tol_val
					)
				}
			}
		}
	});
	($left: expr, $right: expr) => (assert_approx_eq!(($left), ($right), 1e-15))
}




#[cfg(test)]
mod tests {
	#[test]
    fn div_roundup() {
		for o in 1..20 {
			assert_eq!(super::div_roundup(0, o), 0);
			for i in 1..=o {
				assert_eq!(super::div_roundup(i, o), 1);
			}
			for i in o+1..=2*o {
				assert_eq!(super::div_roundup(i, o), 2);
			}
		}
    }

	#[test]
	fn add_assign_slice() {
		let mut dst = vec![1.0f64, 2.0, 3.0];
		super::add_assign_slice(&mut dst, &[0.5, 0.5, -3.0]);
		assert_eq!(dst, vec![1.5, 2.5, 0.0]);

		let mut cnt = vec![1u64, 0];
		super::add_assign_counts(&mut cnt, &[2, 5]);
		assert_eq!(cnt, vec![3, 5]);
	}
}
