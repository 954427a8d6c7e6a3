#![recursion_limit = "128"]

extern crate proc_macro;

/// Field and variant annotations.
mod attrs;
/// Support for enum auto-derive.
mod enum_impl;
/// Support for struct auto-derive.
mod struct_impl;

use proc_macro::TokenStream;
use quote::quote;
use syn::*;

/// Derives `PackedRep`.
///
/// * Structs with named fields become objects keyed by field name.
/// * Tuple structs and enum variants become arrays headed by their name.
/// * Unit structs become their name as a string.
///
/// `#[packed(skip)]` leaves a field out; it is rebuilt with `Default::default()`.
/// `#[packed(rename = "...")]` changes the key of a field or the name of a variant.
#[proc_macro_derive(PackedRep, attributes(packed))]
pub fn packed_rep_derive(input: TokenStream) -> TokenStream {
    // Construct a representation of Rust code as a syntax tree
    // that we can manipulate
    let ast = parse_macro_input!(input as DeriveInput);

    // Build the trait implementation
    impl_packed_rep_macro(&ast)
        .unwrap_or_else(Error::into_compile_error)
        .into()
}

fn impl_packed_rep_macro(ast: &DeriveInput) -> Result<proc_macro2::TokenStream> {
    let name = &ast.ident;

    let mut generics = ast.generics.clone();
    for param in generics.type_params_mut() {
        param
            .bounds
            .push(parse_quote!(::packed_json::rep::PackedRep));
    }
    let (impl_generics, ty_generics, where_clause) = generics.split_for_impl();

    let body = match &ast.data {
        Data::Struct(sd) => struct_impl::packed_rep(name, sd)?,
        Data::Enum(ed) => enum_impl::packed_rep(name, ed)?,
        Data::Union(_) => {
            return Err(Error::new_spanned(
                name,
                "`PackedRep` cannot be derived for unions",
            ))
        }
    };

    Ok(quote! {
        impl #impl_generics ::packed_json::rep::PackedRep for #name #ty_generics #where_clause {
            #body
        }
    })
}
