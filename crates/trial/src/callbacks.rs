// Copyright (c) Microsoft Corporation.
// Licensed under the MIT License.

use crate::OnRetryArgs;
use crate::define_fn_wrapper::define_fn_wrapper;

define_fn_wrapper!(Operation<T>(Fn() -> T));
define_fn_wrapper!(IsSuccess<T>(Fn(value: &T) -> bool));
define_fn_wrapper!(OnRetry<T>(Fn(value: &T, args: OnRetryArgs)));
