use crate::attrs::{field_specs, FieldSpec};
use quote::quote;
use syn::*;

pub fn packed_rep(name: &Ident, data: &DataStruct) -> Result<proc_macro2::TokenStream> {
    let ident_string = name.to_string();
    let specs = field_specs(&data.fields)?;
    let kept: Vec<&FieldSpec> = specs.iter().filter(|f| !f.skip).collect();

    let (impl_to_packed, impl_into_packed, impl_from_packed) = match &data.fields {
        // C-style structs
        Fields::Named(_) => {
            let keys: Vec<&String> = kept.iter().map(|f| &f.key).collect();
            let members: Vec<&Member> = kept.iter().map(|f| &f.member).collect();

            // to_packed
            let impl_to_packed = quote! {
                fn to_packed(&self) -> ::packed_json::Packed {
                    ::packed_json::rep::struct_to_packed_helper(vec![
                        #((#keys, ::packed_json::rep::PackedRep::to_packed(&self.#members))),*
                    ])
                }
            };

            // into_packed
            let impl_into_packed = quote! {
                fn into_packed(self) -> ::packed_json::Packed {
                    ::packed_json::rep::struct_to_packed_helper(vec![
                        #((#keys, ::packed_json::rep::PackedRep::into_packed(self.#members))),*
                    ])
                }
            };

            // from_packed
            let inits = specs.iter().map(|f| {
                let member = &f.member;
                if f.skip {
                    quote! { #member: ::std::default::Default::default() }
                } else {
                    quote! { #member: ::packed_json::rep::pop_packed(&mut fields)? }
                }
            });
            let impl_from_packed = quote! {
                fn from_packed(p: ::packed_json::Packed)
                    -> ::std::result::Result<Self, ::packed_json::rep::Error> {
                    #[allow(unused_mut, unused_variables)]
                    let mut fields =
                        ::packed_json::rep::struct_from_packed_helper(p, &[#(#keys),*])?
                        .into_iter();

                    Ok(#name { #(#inits),* })
                }
            };

            (impl_to_packed, impl_into_packed, impl_from_packed)
        }
        // Tuple structs
        Fields::Unnamed(_) => {
            let members: Vec<&Member> = kept.iter().map(|f| &f.member).collect();

            // to_packed
            let impl_to_packed = quote! {
                fn to_packed(&self) -> ::packed_json::Packed {
                    ::packed_json::rep::enum_to_packed_helper(#ident_string, vec![
                        #(::packed_json::rep::PackedRep::to_packed(&self.#members)),*
                    ])
                }
            };

            // into_packed
            let impl_into_packed = quote! {
                fn into_packed(self) -> ::packed_json::Packed {
                    ::packed_json::rep::enum_to_packed_helper(#ident_string, vec![
                        #(::packed_json::rep::PackedRep::into_packed(self.#members)),*
                    ])
                }
            };

            // from_packed
            let popped = specs.iter().map(|f| {
                if f.skip {
                    quote! { ::std::default::Default::default() }
                } else {
                    quote! { ::packed_json::rep::pop_packed(&mut fields)? }
                }
            });
            let impl_from_packed = quote! {
                fn from_packed(p: ::packed_json::Packed)
                    -> ::std::result::Result<Self, ::packed_json::rep::Error> {
                    let mut fields = p.into_vec()?.into_iter();

                    let found: ::std::string::String =
                        ::packed_json::rep::pop_packed(&mut fields)?;
                    if found != #ident_string {
                        ::packed_json::rep::bail!("Expected `{}`, found `{}`", #ident_string, found);
                    }

                    let out = #name(#(#popped),*);
                    ::packed_json::rep::expect_exhausted(&mut fields, #ident_string)?;
                    Ok(out)
                }
            };

            (impl_to_packed, impl_into_packed, impl_from_packed)
        }
        // Unit-like structs
        Fields::Unit => {
            let impl_to_packed = quote! {
                fn to_packed(&self) -> ::packed_json::Packed {
                    ::packed_json::Packed::from(#ident_string)
                }
            };

            let impl_into_packed = quote! {
                fn into_packed(self) -> ::packed_json::Packed {
                    ::packed_json::Packed::from(#ident_string)
                }
            };

            let impl_from_packed = quote! {
                fn from_packed(p: ::packed_json::Packed)
                    -> ::std::result::Result<Self, ::packed_json::rep::Error> {
                    let found: ::std::string::String =
                        ::packed_json::rep::PackedRep::from_packed(p)?;
                    if found == #ident_string {
                        Ok(#name)
                    } else {
                        ::packed_json::rep::bail!("`{}` is not the name of this struct", found)
                    }
                }
            };

            (impl_to_packed, impl_into_packed, impl_from_packed)
        }
    };

    Ok(quote! {
        #impl_to_packed
        #impl_into_packed
        #impl_from_packed
    })
}
