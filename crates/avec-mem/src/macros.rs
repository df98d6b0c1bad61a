#[macro_export]
macro_rules! const_assert {
    ($check:expr $(,$msg:tt)*) => {
        const _: () = assert!($check $(,$msg)*);
    };
}

#[macro_export]
macro_rules! size_of {
    ($t:ty) => {
        size_of::<$t>()
    };
}

/// Implements [`Element`](crate::Element) and [`TryDefault`](crate::TryDefault)
/// for `Clone + Default` types.
///
/// Relocation stays the bitwise default, copies go through `Clone` and default
/// construction through `Default`, none of which can fail.
#[macro_export]
macro_rules! impl_element {
    ($($t:ty),* $(,)?) => {
        $(
            unsafe impl $crate::Element for $t {

                const COPYABLE: bool = true;

                #[inline(always)]
                fn copy_construct(&self) -> ::core::result::Result<Self, $crate::ConstructError> {
                    Ok(::core::clone::Clone::clone(self))
                }

                #[inline(always)]
                fn copy_assign(&mut self, src: &Self) -> ::core::result::Result<(), $crate::ConstructError> {
                    ::core::clone::Clone::clone_from(self, src);
                    Ok(())
                }
            }

            impl $crate::TryDefault for $t {

                #[inline(always)]
                fn try_default() -> ::core::result::Result<Self, $crate::ConstructError> {
                    Ok(<$t as ::core::default::Default>::default())
                }
            }
        )*
    };
}
