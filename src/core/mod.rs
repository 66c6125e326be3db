pub mod fp16;


// Macros
#[macro_export]
macro_rules! fp16 {
    ($lit:literal) => {
        $crate::core::fp16::Fp16::from($lit as f32)
    };
}
