use syn::{ext::IdentExt, *};

#[derive(Default)]
pub struct PackedAttrs {
    pub skip: bool,
    pub rename: Option<String>,
}

impl PackedAttrs {
    /// Reads every `#[packed(...)]` attribute in `attrs`.
    pub fn parse(attrs: &[Attribute]) -> Result<Self> {
        let mut out = PackedAttrs::default();
        for attr in attrs {
            if !attr.path().is_ident("packed") {
                continue;
            }
            attr.parse_nested_meta(|meta| {
                if meta.path.is_ident("skip") {
                    out.skip = true;
                    Ok(())
                } else if meta.path.is_ident("rename") {
                    let s: LitStr = meta.value()?.parse()?;
                    out.rename = Some(s.value());
                    Ok(())
                } else {
                    Err(meta.error("expected `skip` or `rename = \"...\"`"))
                }
            })?;
        }
        Ok(out)
    }
}

/// A field as the generated code sees it.
pub struct FieldSpec {
    /// How the field is accessed or bound: its name, or `field{i}` for tuple fields.
    pub ident: Ident,
    /// `self.0` style accessor for tuple structs.
    pub member: Member,
    /// The key or position label on the wire.
    pub key: String,
    pub skip: bool,
}

pub fn field_specs(fields: &Fields) -> Result<Vec<FieldSpec>> {
    fields
        .iter()
        .enumerate()
        .map(|(i, field)| {
            let attrs = PackedAttrs::parse(&field.attrs)?;
            let (ident, member) = match &field.ident {
                Some(ident) => (ident.clone(), Member::Named(ident.clone())),
                None => (
                    Ident::new(&format!("field{}", i), proc_macro2::Span::call_site()),
                    Member::Unnamed(Index::from(i)),
                ),
            };
            let key = match attrs.rename {
                Some(key) => key,
                None => ident.unraw().to_string(),
            };
            Ok(FieldSpec {
                ident,
                member,
                key,
                skip: attrs.skip,
            })
        })
        .collect()
}
