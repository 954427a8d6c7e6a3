use crate::attrs::{field_specs, FieldSpec, PackedAttrs};
use quote::quote;
use syn::*;

struct VariantSpec<'a> {
    ident: &'a Ident,
    name: String,
    fields: &'a Fields,
    specs: Vec<FieldSpec>,
}

impl VariantSpec<'_> {
    fn kept(&self) -> impl Iterator<Item = &FieldSpec> { self.specs.iter().filter(|f| !f.skip) }

    /// The pattern that destructures this variant, binding only packed fields.
    fn pattern(&self, enum_name: &Ident) -> proc_macro2::TokenStream {
        let variant = self.ident;
        match self.fields {
            Fields::Unit => quote! { #enum_name::#variant },
            Fields::Unnamed(_) => {
                let binds = self.specs.iter().map(|f| {
                    if f.skip {
                        quote! { _ }
                    } else {
                        let ident = &f.ident;
                        quote! { #ident }
                    }
                });
                quote! { #enum_name::#variant(#(#binds),*) }
            }
            Fields::Named(_) => {
                let idents = self.kept().map(|f| &f.ident);
                quote! { #enum_name::#variant { #(#idents,)* .. } }
            }
        }
    }

    /// The packed payload of this variant, converting each bound field with `convert`.
    fn payload(&self, convert: &proc_macro2::TokenStream) -> proc_macro2::TokenStream {
        match self.fields {
            Fields::Unit => quote! { vec![] },
            Fields::Unnamed(_) => {
                let idents = self.kept().map(|f| &f.ident);
                quote! { vec![#(#convert(#idents)),*] }
            }
            Fields::Named(_) => {
                let keys = self.kept().map(|f| &f.key);
                let idents = self.kept().map(|f| &f.ident);
                quote! {
                    vec![::packed_json::rep::struct_to_packed_helper(vec![
                        #((#keys, #convert(#idents))),*
                    ])]
                }
            }
        }
    }
}

pub fn packed_rep(name: &Ident, data: &DataEnum) -> Result<proc_macro2::TokenStream> {
    let ident_string = name.to_string();
    let variants: Vec<VariantSpec> = data
        .variants // variants of the enum
        .iter()
        .map(|variant| {
            let attrs = PackedAttrs::parse(&variant.attrs)?;
            if attrs.skip {
                return Err(Error::new_spanned(
                    &variant.ident,
                    "variants cannot be skipped",
                ));
            }
            Ok(VariantSpec {
                ident: &variant.ident,
                name: attrs.rename.unwrap_or_else(|| variant.ident.to_string()),
                fields: &variant.fields,
                specs: field_specs(&variant.fields)?,
            })
        })
        .collect::<Result<_>>()?;

    // to_packed and into_packed differ only in how fields are converted
    let conversion = |method: proc_macro2::TokenStream| {
        let convert = quote! { ::packed_json::rep::PackedRep::#method };
        let branches = variants.iter().map(|v| {
            let pattern = v.pattern(name);
            let payload = v.payload(&convert);
            let variant_name = &v.name;
            quote! {
                #pattern => ::packed_json::rep::enum_to_packed_helper(#variant_name, #payload),
            }
        });
        quote! { #(#branches)* }
    };

    let to_branches = conversion(quote! { to_packed });
    let impl_to_packed = quote! {
        fn to_packed(&self) -> ::packed_json::Packed {
            match self {
                #to_branches
            }
        }
    };

    let into_branches = conversion(quote! { into_packed });
    let impl_into_packed = quote! {
        fn into_packed(self) -> ::packed_json::Packed {
            match self {
                #into_branches
            }
        }
    };

    // from_packed
    let from_branches = variants.iter().map(|v| {
        let variant = v.ident;
        let variant_name = &v.name;
        match v.fields {
            // Unit-like variant
            Fields::Unit => quote! { #variant_name => #name::#variant, },
            // Named-tuple variant
            Fields::Unnamed(_) => {
                let popped = v.specs.iter().map(|f| {
                    if f.skip {
                        quote! { ::std::default::Default::default() }
                    } else {
                        quote! { ::packed_json::rep::pop_packed(&mut fields)? }
                    }
                });
                quote! { #variant_name => #name::#variant(#(#popped),*), }
            }
            // C-style struct variant
            Fields::Named(_) => {
                let keys = v.kept().map(|f| &f.key);
                let inits = v.specs.iter().map(|f| {
                    let ident = &f.ident;
                    if f.skip {
                        quote! { #ident: ::std::default::Default::default() }
                    } else {
                        quote! { #ident: ::packed_json::rep::pop_packed(&mut named)? }
                    }
                });
                quote! {
                    #variant_name => {
                        let object: ::packed_json::Packed =
                            ::packed_json::rep::pop_packed(&mut fields)?;
                        #[allow(unused_mut, unused_variables)]
                        let mut named =
                            ::packed_json::rep::struct_from_packed_helper(object, &[#(#keys),*])?
                            .into_iter();
                        #name::#variant { #(#inits),* }
                    }
                }
            }
        }
    });

    let impl_from_packed = quote! {
        fn from_packed(p: ::packed_json::Packed)
            -> ::std::result::Result<Self, ::packed_json::rep::Error> {
            let mut fields = p.into_vec()?.into_iter();

            let found: ::std::string::String = ::packed_json::rep::pop_packed(&mut fields)?;

            let out = match found.as_str() {
                #(#from_branches)*
                unknown => ::packed_json::rep::bail!(
                    "`{}` is not a variant of `{}`",
                    unknown,
                    #ident_string
                ),
            };

            // there shouldn't be any fields left
            ::packed_json::rep::expect_exhausted(&mut fields, &found)?;
            Ok(out)
        }
    };

    Ok(quote! {
        #impl_to_packed
        #impl_into_packed
        #impl_from_packed
    })
}
