use alloc::borrow::Cow;

use super::{Codec, ValueCodec};
use crate::tag::{ContainerKind, TypeTag};
use crate::value::for_each_scalar;
use crate::value::HashMap;

/// Inserts the built-in codecs, keeping entries that already exist.
pub(super) fn register_basic_types(codecs: &mut HashMap<Cow<'static, str>, Codec>) {
    macro_rules! scalar_codec {
        ($($variant:ident($ty:ty)),*) => {
            $(
                codecs
                    .entry(Cow::Borrowed(<$ty as TypeTag>::type_tag()))
                    .or_insert_with(|| Codec::Value(ValueCodec::of_scalar::<$ty>()));
            )*
        };
    }

    for_each_scalar!(scalar_codec);

    for kind in [ContainerKind::List, ContainerKind::Set, ContainerKind::Map] {
        codecs
            .entry(Cow::Borrowed(kind.tag()))
            .or_insert(Codec::Container(kind));
    }
}

// -----------------------------------------------------------------------------
// Tests
