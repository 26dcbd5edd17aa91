//! Lapbench Macros
//!
//! Procedural macros for benchmark registration.
//!
//! ## Macros
//!
//! - `#[bench]` - Register a zero-argument function as a benchmark
//!
//! The function name becomes the registered identifier, so it must carry
//! the `bench_` prefix; registration validates this when the inventory is
//! collected.
//!
//! ## Options
//!
//! - `#[bench(count = 1024)]` - bind a fixed-repetition runner
//! - `#[bench(time_ms = 50.0)]` - bind a fixed-duration runner

use proc_macro::TokenStream;
use quote::quote;
use syn::{parse_macro_input, ItemFn};

/// Register a benchmark function.
///
/// ```ignore
/// #[bench(count = 4096)]
/// fn bench_push() {
///     // workload
/// }
/// ```
#[proc_macro_attribute]
pub fn bench(attr: TokenStream, item: TokenStream) -> TokenStream {
    let mut count: Option<u64> = None;
    let mut time_ms: Option<f64> = None;

    let parser = syn::meta::parser(|meta| {
        if meta.path.is_ident("count") {
            let value: syn::LitInt = meta.value()?.parse()?;
            count = Some(value.base10_parse()?);
            Ok(())
        } else if meta.path.is_ident("time_ms") {
            let value: syn::LitFloat = meta.value()?.parse()?;
            time_ms = Some(value.base10_parse()?);
            Ok(())
        } else {
            Err(meta.error("unsupported bench attribute; expected `count` or `time_ms`"))
        }
    });
    parse_macro_input!(attr with parser);

    let func = parse_macro_input!(item as ItemFn);
    let name = &func.sig.ident;
    let name_str = name.to_string();

    let runner = match (count, time_ms) {
        (Some(n), _) => {
            quote! { ::core::option::Option::Some(::lapbench::RunnerSpec::Count(#n)) }
        }
        (None, Some(ms)) => {
            quote! { ::core::option::Option::Some(::lapbench::RunnerSpec::TimeMs(#ms)) }
        }
        (None, None) => quote! { ::core::option::Option::None },
    };

    let expanded = quote! {
        #func

        ::lapbench::internal::inventory::submit! {
            ::lapbench::BenchDef {
                name: #name_str,
                runner: #runner,
                workload: #name,
                file: ::core::file!(),
                line: ::core::line!(),
            }
        }
    };

    expanded.into()
}
